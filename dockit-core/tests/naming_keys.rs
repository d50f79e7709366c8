use chrono::NaiveDate;
use dockit_core::naming::{
    build_key, infer_title, parse_tags, slugify, KeyMode, UploadRequest,
};
use std::path::{Path, PathBuf};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn request(source: &str, tags: &[&str], title: &str, mode: KeyMode) -> UploadRequest {
    UploadRequest {
        file_path: PathBuf::from("random.pdf"),
        source: source.to_string(),
        received_date: date(2023, 11, 2),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        title: title.to_string(),
        mode,
    }
}

fn is_slug(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[test]
fn slugify_normalises_case_whitespace_and_symbols() {
    assert_eq!(slugify("  W2 Form  "), "w2-form");
    assert_eq!(slugify("Chase\t\n  Bank"), "chase-bank");
    assert_eq!(slugify("a/b\\c..d"), "abcd");
    assert_eq!(slugify("Ünïcode Straße"), "ncode-strae");
    assert_eq!(slugify(""), "");
    assert_eq!(slugify("../../etc/passwd"), "etcpasswd");
}

#[test]
fn slugify_is_idempotent_and_only_emits_slug_characters() {
    let samples = [
        "Hello World",
        "  multiple   spaces here ",
        "MiXeD_case-with.dots",
        "tabs\tand\nnewlines",
        "emoji 📄 inside",
        "--already-a-slug--",
        "ÀÉÎÕÜ 123",
        "",
        "   ",
    ];
    for sample in samples {
        let once = slugify(sample);
        assert!(is_slug(&once), "{sample:?} produced {once:?}");
        assert_eq!(slugify(&once), once, "slugify not idempotent for {sample:?}");
    }
}

#[test]
fn interactive_key_matches_documented_layout() {
    let key = build_key(&request("chase", &["tax"], "w2 form", KeyMode::Interactive));
    assert_eq!(
        key.as_str(),
        "documents/2023/11/chase-tax--2023-11-02--w2-form.pdf"
    );
}

#[test]
fn interactive_key_joins_multiple_tags_with_hyphens() {
    let key = build_key(&request(
        "Kaiser Permanente",
        &["insurance", "Medical Bills"],
        "EOB",
        KeyMode::Interactive,
    ));
    assert_eq!(
        key.as_str(),
        "documents/2023/11/kaiser-permanente-insurance-medical-bills--2023-11-02--eob.pdf"
    );
}

#[test]
fn inference_key_omits_source_and_tags() {
    let mut req = request("chase", &["tax"], "scan", KeyMode::FilenameInference);
    req.received_date = date(2024, 3, 15);
    assert_eq!(
        build_key(&req).as_str(),
        "documents/2024/03/2024-03-15--scan.pdf"
    );
}

#[test]
fn empty_components_fall_back_to_placeholders() {
    let key = build_key(&request("!!!", &[], "   ", KeyMode::Interactive));
    assert_eq!(
        key.as_str(),
        "documents/2023/11/unknown-untagged--2023-11-02--untitled.pdf"
    );
}

#[test]
fn year_and_month_are_zero_padded() {
    let mut req = request("bank", &["misc"], "old", KeyMode::Interactive);
    req.received_date = date(987, 1, 5);
    assert_eq!(
        build_key(&req).as_str(),
        "documents/0987/01/bank-misc--0987-01-05--old.pdf"
    );
}

#[test]
fn build_key_is_deterministic() {
    let req = request("Chase", &["tax", "finance"], "Year End", KeyMode::Interactive);
    let first = build_key(&req);
    for _ in 0..5 {
        assert_eq!(build_key(&req.clone()), first);
    }
}

#[test]
fn key_segments_never_traverse_directories() {
    let req = request("..", &[".."], "../../secret", KeyMode::Interactive);
    let key = build_key(&req);
    for segment in key.as_str().split('/') {
        assert_ne!(segment, "..");
        assert_ne!(segment, ".");
    }
    let file_segment = key.as_str().rsplit('/').next().unwrap();
    let stem = file_segment.trim_end_matches(".pdf");
    assert!(is_slug(stem), "unexpected characters in {stem:?}");
}

#[test]
fn parse_tags_trims_drops_blanks_and_dedupes_in_order() {
    assert_eq!(
        parse_tags(" tax, finance ,,tax,  chase "),
        vec!["tax".to_string(), "finance".to_string(), "chase".to_string()]
    );
    assert!(parse_tags(" , ,").is_empty());
}

#[test]
fn infer_title_strips_embedded_date() {
    assert_eq!(infer_title(Path::new("scans/scan-2024-03-15.pdf")), "scan");
    assert_eq!(
        infer_title(Path::new("2024-01-31_chase_statement.pdf")),
        "chase_statement"
    );
    assert_eq!(infer_title(Path::new("random.pdf")), "random");
    assert_eq!(infer_title(Path::new("2024-03-15.pdf")), "2024-03-15");
}
