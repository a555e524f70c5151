//! Index store contract
//!
//! Everything the query evaluator, ranker and snippet extractor need from the
//! underlying index. Lookups that find nothing return empty results; `Err` is
//! reserved for storage failures, which abort the query.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use super::phrase::contains_phrase;
use super::position::Position;
use crate::storage::Result;

/// Positional inverted index with metadata.
pub trait IndexStore {
    /// Opaque document handle. Compared for equality; ordering only breaks ties.
    type DocId: Clone + Eq + Ord + Hash + Debug;

    /// Documents containing `term` at any position, sentinels included.
    fn find_documents_for_term(&self, term: &str) -> Result<Vec<Self::DocId>>;

    /// Documents whose metadata holds exactly `key == value` after normalization.
    fn find_documents_for_metadata(&self, key: &str, value: &str) -> Result<Vec<Self::DocId>>;

    /// Occurrences of `term` in `doc`; 0 when either is unknown.
    fn frequency(&self, doc: &Self::DocId, term: &str) -> Result<u64>;

    /// Occurrences of `term` across the corpus; 0 when unseen.
    fn total_frequency(&self, term: &str) -> Result<u64>;

    /// All positions of `term` in `doc`, sentinels included.
    fn get_term_locations(&self, term: &str, doc: &Self::DocId) -> Result<Vec<Position>>;

    /// Space-joined terms at literal positions in `[start, end]`, in order.
    fn reconstruct_partial_document(&self, doc: &Self::DocId, start: u32, end: u32) -> Result<String>;

    /// Normalized metadata of `doc`; empty for unknown documents.
    fn find_metadata_for_document(&self, doc: &Self::DocId) -> Result<BTreeMap<String, String>>;

    /// Number of indexed documents.
    fn count_documents(&self) -> Result<u64>;

    /// Documents where `words` occur at consecutive literal positions.
    fn documents_with_phrase(&self, words: &[String]) -> Result<Vec<Self::DocId>> {
        let Some(first) = words.first() else {
            return Ok(Vec::new());
        };

        let mut matched = Vec::new();
        for doc in self.find_documents_for_term(first)? {
            if contains_phrase(self, words, &doc)? {
                matched.push(doc);
            }
        }
        Ok(matched)
    }

    /// The whole normalized body of `doc`.
    fn reconstruct_document(&self, doc: &Self::DocId) -> Result<String> {
        self.reconstruct_partial_document(doc, 0, u32::MAX)
    }
}
