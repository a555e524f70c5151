//! Document normalization
//!
//! Turns raw text into the normalized term sequence the index stores, with
//! each term mapped to its positions. Metadata values and spelling corrections
//! contribute sentinel occurrences so they are searchable by term but never take
//! part in phrase or snippet arithmetic.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Only the first part of very large documents is indexed.
pub const MAX_INDEXED_BYTES: usize = 100_000;

/// Lowercase, drop punctuation and split on whitespace.
pub fn parse_document(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .filter(|&c| c.is_alphanumeric() || c == '_' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Normalize a metadata key or value: parse, then join words with `_`.
pub fn normalize(text: &str) -> String {
    parse_document(text).join("_")
}

/// Truncate at the last char boundary not past `max` bytes.
fn truncate_to(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Rewrites likely misspellings found while indexing.
///
/// `doc_terms` holds term counts for the document being indexed, so corrections
/// can prefer spellings the document itself uses.
pub trait SpellingCorrector {
    /// The corrected term, or `None` when `term` should stay as is.
    fn correct(&self, term: &str, doc_terms: &HashMap<String, usize>) -> Option<String>;
}

/// A normalized document ready to be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Where the document came from
    pub uri: String,
    /// Normalized key -> normalized value
    pub metadata: BTreeMap<String, String>,
    /// Term -> every occurrence, literal or sentinel
    pub words: BTreeMap<String, Vec<Position>>,
}

impl Document {
    /// Index `text` without spelling correction.
    pub fn new(uri: impl Into<String>, text: &str, metadata: &BTreeMap<String, String>) -> Self {
        Self::index(uri, text, metadata, None)
    }

    /// Index `text`, optionally recording spelling variants from `corrector`.
    pub fn index(
        uri: impl Into<String>,
        text: &str,
        metadata: &BTreeMap<String, String>,
        corrector: Option<&dyn SpellingCorrector>,
    ) -> Self {
        let terms = parse_document(truncate_to(text, MAX_INDEXED_BYTES));
        let mut words: BTreeMap<String, Vec<Position>> = BTreeMap::new();

        let mut counts: HashMap<String, usize> = HashMap::new();
        if corrector.is_some() {
            for term in &terms {
                *counts.entry(term.clone()).or_default() += 1;
            }
        }

        for (offset, term) in terms.iter().enumerate() {
            let Ok(offset) = u32::try_from(offset) else {
                break;
            };
            words
                .entry(term.clone())
                .or_default()
                .push(Position::Literal(offset));

            if let Some(corrected) = corrector.and_then(|c| c.correct(term, &counts)) {
                if corrected != *term {
                    words
                        .entry(corrected)
                        .or_default()
                        .push(Position::SpellingVariant);
                }
            }
        }

        let values: Vec<&str> = metadata.values().map(String::as_str).collect();
        for term in parse_document(&values.join(" ")) {
            words.entry(term).or_default().push(Position::MetadataOccurrence);
        }

        let metadata = metadata
            .iter()
            .map(|(k, v)| (normalize(k), normalize(v)))
            .collect();

        Self {
            uri: uri.into(),
            metadata,
            words,
        }
    }

    /// Total occurrences of `term`, sentinels included.
    pub fn frequency(&self, term: &str) -> usize {
        self.words.get(term).map_or(0, Vec::len)
    }

    /// Number of literal body terms.
    pub fn body_len(&self) -> usize {
        self.words
            .values()
            .flatten()
            .filter(|p| p.literal().is_some())
            .count()
    }
}
