//! # naming: storage keys for scanned documents
//!
//! Keys follow one of two layouts:
//!
//! ```text
//! documents/{yyyy}/{mm}/{source}-{tags}--{yyyy-mm-dd}--{title}.pdf   (interactive)
//! documents/{yyyy}/{mm}/{yyyy-mm-dd}--{title}.pdf                    (filename inference)
//! ```
//!
//! Every free-text component passes through [`slugify`], so a key segment only ever holds
//! `[a-z0-9-]` and can never be `.` or `..`.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::date::{extract_date, format_date, strip_date};

pub const KEY_PREFIX: &str = "documents";
pub const DOCUMENT_EXTENSION: &str = "pdf";
pub const DOCUMENT_CONTENT_TYPE: &str = "application/pdf";

pub const FALLBACK_SOURCE: &str = "unknown";
pub const FALLBACK_TAG: &str = "untagged";
pub const FALLBACK_TITLE: &str = "untitled";

/// Which key layout to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Interactive,
    FilenameInference,
}

/// Everything needed to name one file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub source: String,
    pub received_date: NaiveDate,
    pub tags: Vec<String>,
    pub title: String,
    pub mode: KeyMode,
}

/// A fully built object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

/// Trim, lowercase, turn whitespace runs into `-`, drop anything outside `[a-z0-9-]`.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
        }
    }
    out
}

/// Splits a comma-separated tag list. Blank entries are dropped, duplicates keep their first position.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn slug_or(input: &str, fallback: &str) -> String {
    let slug = slugify(input);
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// Composes the storage key for `request`. Pure: equal inputs give equal keys.
pub fn build_key(request: &UploadRequest) -> StorageKey {
    let date = request.received_date;
    let title = slug_or(&request.title, FALLBACK_TITLE);
    let file_name = match request.mode {
        KeyMode::Interactive => {
            let source = slug_or(&request.source, FALLBACK_SOURCE);
            let tags = slug_or(&request.tags.join("-"), FALLBACK_TAG);
            format!(
                "{source}-{tags}--{}--{title}.{DOCUMENT_EXTENSION}",
                format_date(date)
            )
        }
        KeyMode::FilenameInference => {
            format!("{}--{title}.{DOCUMENT_EXTENSION}", format_date(date))
        }
    };
    StorageKey(format!(
        "{KEY_PREFIX}/{:04}/{:02}/{file_name}",
        date.year(),
        date.month()
    ))
}

/// File name without directory and extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Default title for a file: its stem with any embedded date removed.
pub fn infer_title(path: &Path) -> String {
    let stem = file_stem(path);
    match extract_date(&stem) {
        Some(date) => {
            let title = strip_date(&stem, date);
            if title.is_empty() {
                stem
            } else {
                title
            }
        }
        None => stem,
    }
}
