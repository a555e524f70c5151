//! Inverse collection frequency ranking
//!
//! score(d) = sum over query words t of freq(d, t) / total_freq(t)
//!
//! Rare terms dominate. There is no term-frequency saturation and no length
//! normalization. Words repeated in the query count once per repetition.

use std::collections::{HashMap, HashSet};

use crate::index::IndexStore;
use crate::query::word_only_tokenize;
use crate::storage::Result;

/// `1 / total_frequency(term)`, or 0 for a term the corpus never saw.
pub fn inverse_term_frequency<S: IndexStore + ?Sized>(term: &str, store: &S) -> Result<f64> {
    let total = store.total_frequency(term)?;
    if total == 0 {
        return Ok(0.0);
    }
    Ok(1.0 / total as f64)
}

/// Score every distinct candidate against the words of `query`.
///
/// Every candidate gets an entry, even when it scores zero.
pub fn rank_documents<S: IndexStore + ?Sized>(
    query: &str,
    candidates: &[S::DocId],
    store: &S,
) -> Result<HashMap<S::DocId, f64>> {
    let unique: HashSet<&S::DocId> = candidates.iter().collect();
    let mut scores: HashMap<S::DocId, f64> =
        unique.into_iter().map(|d| (d.clone(), 0.0)).collect();

    for word in word_only_tokenize(query) {
        let weight = inverse_term_frequency(&word, store)?;
        if weight == 0.0 {
            continue;
        }

        for (doc, score) in scores.iter_mut() {
            *score += weight * store.frequency(doc, &word)? as f64;
        }
    }

    Ok(scores)
}

/// Best first: score descending, then document id ascending.
pub fn sort_ranked<D: Ord>(scores: HashMap<D, f64>) -> Vec<(D, f64)> {
    let mut ranked: Vec<(D, f64)> = scores.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
