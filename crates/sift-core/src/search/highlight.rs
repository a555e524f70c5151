//! Query term highlighting

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::query::word_only_tokenize;

/// Markup placed around each matched word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightMarkers {
    pub prefix: String,
    pub suffix: String,
}

impl Default for HighlightMarkers {
    fn default() -> Self {
        Self {
            prefix: "<b>".to_string(),
            suffix: "</b>".to_string(),
        }
    }
}

impl HighlightMarkers {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// No markup at all, for plain-text output
    pub fn none() -> Self {
        Self::new("", "")
    }
}

/// Wrap every snippet word that also appears in `query`.
///
/// Both sides are normalized through the word-only tokenizer first, so the
/// result is lowercase and single-spaced.
pub fn bold_summary(query: &str, snippet: &str, markers: &HighlightMarkers) -> String {
    let terms: HashSet<String> = word_only_tokenize(query).into_iter().collect();

    word_only_tokenize(snippet)
        .into_iter()
        .map(|word| {
            if terms.contains(&word) {
                format!("{}{}{}", markers.prefix, word, markers.suffix)
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
