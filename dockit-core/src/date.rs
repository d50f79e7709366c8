//! Calendar dates embedded in file names.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date format (YYYY-MM-DD): {0:?}")]
    Format(String),
    #[error("Not a calendar date: {0}")]
    OutOfRange(String),
}

fn date_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("date token regex is valid"))
}

fn whole_date() -> &'static Regex {
    static WHOLE: OnceLock<Regex> = OnceLock::new();
    WHOLE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date regex is valid"))
}

/// Returns the first `YYYY-MM-DD` token of `file_name` if it names a real day.
///
/// Only the first token is considered: `2024-13-40-2024-01-01` yields `None`.
pub fn extract_date(file_name: &str) -> Option<NaiveDate> {
    let token = date_token().find(file_name)?;
    match NaiveDate::parse_from_str(token.as_str(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(file_name, token = token.as_str(), error = %e, "Date token is not a calendar date");
            None
        }
    }
}

/// Parses a manually entered date. The whole (trimmed) input must be `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let input = input.trim();
    if !whole_date().is_match(input) {
        return Err(DateError::Format(input.to_string()));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| DateError::OutOfRange(input.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Removes `date`'s token from `stem` and trims the separators left around it.
///
/// `scan-2024-03-15` becomes `scan`; `2024-03-15_chase_statement` becomes `chase_statement`.
pub fn strip_date(stem: &str, date: NaiveDate) -> String {
    let token = format_date(date);
    let without = stem.replacen(&token, " ", 1);
    let is_sep = |c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace();
    let parts: Vec<&str> = without
        .split(' ')
        .map(|part| part.trim_matches(is_sep))
        .filter(|part| !part.is_empty())
        .collect();
    parts.join(" ")
}
