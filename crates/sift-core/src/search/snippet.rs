//! Snippet extraction
//!
//! Picks the fixed-width window of term positions carrying the most query
//! weight in one document, then has the store rebuild that stretch of text.

use std::collections::BTreeMap;

use super::ranker::inverse_term_frequency;
use crate::index::IndexStore;
use crate::query::word_only_tokenize;
use crate::storage::Result;

/// Snippet width in term positions unless configured otherwise
pub const DEFAULT_SNIPPET_LENGTH: u32 = 20;

/// Map each literal position of a query word in `doc` to that word's weight.
///
/// A position hit by several words keeps the weight of the last one. When
/// nothing matches (a metadata-only query, say) the start of the document is
/// used instead: `{0: 1.0}`.
pub fn location_worth<S: IndexStore + ?Sized>(
    query: &str,
    doc: &S::DocId,
    store: &S,
) -> Result<BTreeMap<u32, f64>> {
    let mut worth = BTreeMap::new();

    for term in word_only_tokenize(query) {
        let weight = inverse_term_frequency(&term, store)?;
        for position in store.get_term_locations(&term, doc)? {
            if let Some(offset) = position.literal() {
                worth.insert(offset, weight);
            }
        }
    }

    if worth.is_empty() {
        worth.insert(0, 1.0);
    }
    Ok(worth)
}

/// Start of the `length`-wide window with the greatest total worth.
///
/// Candidate starts run from the first recorded position to the last one minus
/// `length`. Only a strictly greater total replaces the current best, so ties
/// keep the earliest start; when no start is tried, the first position wins.
pub fn best_window_start(worth: &BTreeMap<u32, f64>, length: u32) -> u32 {
    let (Some(&first), Some(&last)) = (worth.keys().next(), worth.keys().next_back()) else {
        return 0;
    };

    let mut best_start = first;
    let mut best_score = 0.0;

    let Some(last_start) = last.checked_sub(length) else {
        return best_start;
    };

    for start in first..=last_start {
        let end = start.saturating_add(length);
        let score: f64 = worth.range(start..end).map(|(_, w)| w).sum();
        if score > best_score {
            best_score = score;
            best_start = start;
        }
    }

    best_start
}

/// Highest-worth `length`-position stretch of `doc` for `query`, as text.
pub fn generate_summary<S: IndexStore + ?Sized>(
    query: &str,
    doc: &S::DocId,
    store: &S,
    length: u32,
) -> Result<String> {
    if length == 0 {
        return Ok(String::new());
    }

    let worth = location_worth(query, doc, store)?;
    let start = best_window_start(&worth, length);
    store.reconstruct_partial_document(doc, start, start.saturating_add(length - 1))
}
