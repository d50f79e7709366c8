use dockit_core::config::{
    Config, Credentials, FileConfig, DEFAULT_BUCKET, DEFAULT_REGION, ENV_ACCESS_KEY_ID,
    ENV_BUCKET, ENV_REGION, ENV_SECRET_ACCESS_KEY,
};
use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let config = Config::resolve(FileConfig::default(), |_| None);
    assert_eq!(config.default_bucket, DEFAULT_BUCKET);
    assert_eq!(config.region, DEFAULT_REGION);
    assert!(config.dry_run_default);
    assert!(config.enable_nlp_tagging);
    assert_eq!(config.credentials, None);
    assert_eq!(config, Config::default());
}

#[test]
fn file_values_override_defaults() {
    let file = FileConfig {
        default_bucket: Some("family-archive".into()),
        region: Some("eu-central-1".into()),
        dry_run_default: Some(false),
        enable_nlp_tagging: Some(false),
        aws_access_key_id: Some("AKIAFILE".into()),
        aws_secret_access_key: Some("file-secret".into()),
    };
    let config = Config::resolve(file, |_| None);
    assert_eq!(config.default_bucket, "family-archive");
    assert_eq!(config.region, "eu-central-1");
    assert!(!config.dry_run_default);
    assert!(!config.enable_nlp_tagging);
    assert_eq!(
        config.credentials,
        Some(Credentials {
            access_key_id: "AKIAFILE".into(),
            secret_access_key: "file-secret".into(),
        })
    );
}

#[test]
fn environment_overrides_file_values() {
    let file = FileConfig {
        default_bucket: Some("from-file".into()),
        region: Some("eu-central-1".into()),
        aws_access_key_id: Some("AKIAFILE".into()),
        aws_secret_access_key: Some("file-secret".into()),
        ..FileConfig::default()
    };
    let env = env_of(&[
        (ENV_BUCKET, "from-env"),
        (ENV_REGION, "us-east-2"),
        (ENV_ACCESS_KEY_ID, "AKIAENV"),
        (ENV_SECRET_ACCESS_KEY, "env-secret"),
    ]);
    let config = Config::resolve(file, env);
    assert_eq!(config.default_bucket, "from-env");
    assert_eq!(config.region, "us-east-2");
    let creds = config.credentials.expect("credentials resolved");
    assert_eq!(creds.access_key_id, "AKIAENV");
    assert_eq!(creds.secret_access_key, "env-secret");
}

#[test]
fn empty_strings_count_as_unset() {
    let file = FileConfig {
        default_bucket: Some("".into()),
        aws_access_key_id: Some("".into()),
        aws_secret_access_key: Some("".into()),
        ..FileConfig::default()
    };
    let config = Config::resolve(file, env_of(&[(ENV_REGION, "  ")]));
    assert_eq!(config.default_bucket, DEFAULT_BUCKET);
    assert_eq!(config.region, DEFAULT_REGION);
    assert_eq!(config.credentials, None);
}

#[test]
fn half_configured_credentials_are_ignored() {
    let config = Config::resolve(
        FileConfig::default(),
        env_of(&[(ENV_ACCESS_KEY_ID, "AKIAONLY")]),
    );
    assert_eq!(config.credentials, None);
}

#[test]
fn credentials_debug_output_hides_secret() {
    let creds = Credentials {
        access_key_id: "AKIA".into(),
        secret_access_key: "super-secret".into(),
    };
    let printed = format!("{creds:?}");
    assert!(printed.contains("AKIA"));
    assert!(!printed.contains("super-secret"));
}

#[test]
fn file_config_uses_camel_case_keys() {
    let parsed: FileConfig = serde_json::from_str(
        r#"{"defaultBucket":"b","region":"r","dryRunDefault":false,"enableNlpTagging":true}"#,
    )
    .expect("valid config json");
    assert_eq!(parsed.default_bucket.as_deref(), Some("b"));
    assert_eq!(parsed.region.as_deref(), Some("r"));
    assert_eq!(parsed.dry_run_default, Some(false));
    assert_eq!(parsed.enable_nlp_tagging, Some(true));
    assert_eq!(parsed.aws_access_key_id, None);
}

#[test]
fn template_spells_out_defaults_and_seeds_credentials() {
    let template = FileConfig::template(env_of(&[(ENV_ACCESS_KEY_ID, "AKIASEED")]));
    assert_eq!(template.default_bucket.as_deref(), Some(DEFAULT_BUCKET));
    assert_eq!(template.region.as_deref(), Some(DEFAULT_REGION));
    assert_eq!(template.dry_run_default, Some(true));
    assert_eq!(template.enable_nlp_tagging, Some(true));
    assert_eq!(template.aws_access_key_id.as_deref(), Some("AKIASEED"));
    assert_eq!(template.aws_secret_access_key.as_deref(), Some(""));
}
