//! Tag suggestions derived from a file name.
//!
//! Two sources feed the result: a fixed keyword table, and optionally a
//! [`TokenExtractor`] that proposes noun-like words from the name itself.

use std::collections::BTreeSet;
use tracing::debug;

use crate::contract::TokenExtractor;

/// Substring → tag. A file name containing the keyword (case-insensitive) earns the tag.
pub const KEYWORD_TAGS: &[(&str, &str)] = &[
    ("chase", "chase"),
    ("kaiser", "kaiser"),
    ("w2", "tax"),
    ("1099", "tax"),
    ("statement", "finance"),
    ("benefit", "insurance"),
];

pub struct Tagger {
    extractor: Box<dyn TokenExtractor>,
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new(Box::new(NounHeuristic::default()))
    }
}

impl Tagger {
    pub fn new(extractor: Box<dyn TokenExtractor>) -> Self {
        Self { extractor }
    }

    /// Keyword-matching only; the heuristic flag has no effect.
    pub fn keyword_only() -> Self {
        Self::new(Box::new(KeywordOnly))
    }

    pub fn tag(&self, file_name: &str, use_heuristic: bool) -> BTreeSet<String> {
        let lowered = file_name.to_lowercase();
        let mut tags: BTreeSet<String> = KEYWORD_TAGS
            .iter()
            .filter(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, tag)| tag.to_string())
            .collect();

        if use_heuristic {
            tags.extend(
                self.extractor
                    .extract(file_name)
                    .into_iter()
                    .map(|token| token.to_lowercase())
                    .filter(|token| !token.is_empty()),
            );
        }

        debug!(file_name, use_heuristic, ?tags, "Suggested tags");
        tags
    }
}

/// Extractor for environments without heuristic tagging.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordOnly;

impl TokenExtractor for KeywordOnly {
    fn extract(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "from", "into", "onto", "over", "under", "per", "via", "our",
    "your", "his", "her", "its", "their", "this", "that", "these", "those", "not", "all", "any",
    "new", "old", "final", "draft", "copy", "scan", "scanned", "img", "image", "doc", "docs",
    "pdf", "jpg", "jpeg", "png", "tif", "tiff", "page", "pages", "part", "version", "rev",
];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    "january", "february", "march", "april", "june", "july", "august", "september", "october",
    "november", "december",
];

/// Lightweight noun guesser: keeps alphabetic words that are not stopwords, month names or
/// verb-like forms.
#[derive(Debug, Clone)]
pub struct NounHeuristic {
    min_len: usize,
}

impl Default for NounHeuristic {
    fn default() -> Self {
        Self { min_len: 3 }
    }
}

impl NounHeuristic {
    fn words(text: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();
        let mut prev_lower = false;
        for c in text.chars() {
            if !c.is_alphanumeric() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }
            // camelCase boundary
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
        words
    }

    fn looks_like_noun(&self, word: &str) -> bool {
        word.chars().count() >= self.min_len
            && word.chars().all(char::is_alphabetic)
            && !STOPWORDS.contains(&word)
            && !MONTHS.contains(&word)
            && !(word.ends_with("ing") && word.len() > 5)
            && !(word.ends_with("ed") && word.len() > 4)
    }
}

impl TokenExtractor for NounHeuristic {
    fn extract(&self, text: &str) -> Vec<String> {
        let mut nouns: Vec<String> = Vec::new();
        for word in Self::words(text) {
            let word = word.to_lowercase();
            if self.looks_like_noun(&word) && !nouns.contains(&word) {
                nouns.push(word);
            }
        }
        nouns
    }
}
