//! Resolved runtime configuration.
//!
//! A [`Config`] is built once at start-up from three layers, highest precedence first:
//! environment variables, the user's config file ([`FileConfig`]), built-in defaults.
//! It is then passed by reference and never mutated.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_BUCKET: &str = "your-default-bucket";
pub const DEFAULT_REGION: &str = "us-west-2";

pub const ENV_BUCKET: &str = "S3_BUCKET";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// On-disk shape of `~/.dockitrc.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_nlp_tagging: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_access_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_secret_access_key: Option<String>,
}

impl FileConfig {
    /// The file written by `dockit config`: all defaults spelled out, credentials seeded
    /// from `env` when present.
    pub fn template<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        FileConfig {
            default_bucket: Some(DEFAULT_BUCKET.to_string()),
            region: Some(DEFAULT_REGION.to_string()),
            dry_run_default: Some(true),
            enable_nlp_tagging: Some(true),
            aws_access_key_id: Some(env(ENV_ACCESS_KEY_ID).unwrap_or_default()),
            aws_secret_access_key: Some(env(ENV_SECRET_ACCESS_KEY).unwrap_or_default()),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub default_bucket: String,
    pub region: String,
    pub dry_run_default: bool,
    pub enable_nlp_tagging: bool,
    /// `None` means "use the storage client's default credential chain".
    pub credentials: Option<Credentials>,
}

impl Default for Config {
    fn default() -> Self {
        Config::resolve(FileConfig::default(), |_| None)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Merges `file` with environment lookups from `env`. Empty strings count as unset.
    pub fn resolve<F>(file: FileConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |var: &str, from_file: Option<String>| non_empty(env(var)).or(non_empty(from_file));

        let default_bucket =
            pick(ENV_BUCKET, file.default_bucket).unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        let region = pick(ENV_REGION, file.region).unwrap_or_else(|| DEFAULT_REGION.to_string());
        let access_key_id = pick(ENV_ACCESS_KEY_ID, file.aws_access_key_id);
        let secret_access_key = pick(ENV_SECRET_ACCESS_KEY, file.aws_secret_access_key);

        let credentials = match (access_key_id, secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials {
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        let config = Config {
            default_bucket,
            region,
            dry_run_default: file.dry_run_default.unwrap_or(true),
            enable_nlp_tagging: file.enable_nlp_tagging.unwrap_or(true),
            credentials,
        };
        config.trace_loaded();
        config
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.default_bucket,
            region = %self.region,
            dry_run_default = self.dry_run_default,
            enable_nlp_tagging = self.enable_nlp_tagging,
            static_credentials = self.credentials.is_some(),
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
