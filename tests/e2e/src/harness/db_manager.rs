//! Test Index Manager
//!
//! Provides isolated index instances for testing:
//! - Temporary databases that are automatically cleaned up
//! - Seeding from fixture corpora
//! - Reopening to check persistence

use std::path::PathBuf;

use sift_core::{IndexStore, SqliteIndex};
use tempfile::TempDir;

use crate::mocks::{Fixture, FixtureCorpus};

/// Manager for test indexes
///
/// Creates isolated index instances for each test to prevent interference.
/// Automatically cleans up temporary databases when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let mut db = TestIndexManager::new_temp();
/// db.seed(&FixtureCorpus::library());
///
/// let hits = sift_core::get_results("quick", &db.index)?;
///
/// // Database is automatically deleted when `db` goes out of scope
/// ```
pub struct TestIndexManager {
    /// The index instance
    pub index: SqliteIndex,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    /// Path to the database file
    db_path: PathBuf,
}

impl TestIndexManager {
    /// Create a new test index in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_sift.db");

        let index = SqliteIndex::open(Some(db_path.clone())).expect("Failed to create test index");

        Self {
            index,
            _temp_dir: temp_dir,
            db_path,
        }
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Close and reopen the database file
    pub fn reopen(&mut self) {
        self.index = SqliteIndex::open(Some(self.db_path.clone())).expect("Failed to reopen index");
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.document_count() == 0
    }

    /// Get the number of indexed documents
    pub fn document_count(&self) -> u64 {
        self.index.count_documents().unwrap_or(0)
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Index one fixture, returning its id
    pub fn add(&self, fixture: &Fixture) -> i64 {
        self.index
            .add_document(&fixture.to_document())
            .expect("Failed to index fixture")
    }

    /// Index a plain document with metadata
    pub fn add_text(&self, uri: &str, text: &str, metadata: &[(&str, &str)]) -> i64 {
        self.add(&Fixture::new(uri, text, metadata))
    }

    /// Index every fixture of `corpus`, returning ids in corpus order
    pub fn seed(&self, corpus: &FixtureCorpus) -> Vec<i64> {
        corpus.fixtures.iter().map(|f| self.add(f)).collect()
    }

    // ========================================================================
    // LOOKUP HELPERS
    // ========================================================================

    /// Id of the document stored under `uri`; panics when absent
    pub fn id_of(&self, uri: &str) -> i64 {
        self.index
            .document_id_for_uri(uri)
            .expect("Failed to look up uri")
            .unwrap_or_else(|| panic!("{uri} is not indexed"))
    }

    /// URIs of `ids`, sorted and deduplicated
    pub fn uris(&self, ids: &[i64]) -> Vec<String> {
        let mut uris: Vec<String> = ids
            .iter()
            .filter_map(|&id| self.index.get_document_uri(id).expect("Failed to look up id"))
            .collect();
        uris.sort();
        uris.dedup();
        uris
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_index_starts_empty() {
        let db = TestIndexManager::new_temp();
        assert!(db.is_empty());
        assert!(db.path().ends_with("test_sift.db"));
    }

    #[test]
    fn test_seed_library() {
        let db = TestIndexManager::new_temp();
        let corpus = FixtureCorpus::library();
        let ids = db.seed(&corpus);

        assert_eq!(ids.len(), corpus.len());
        assert_eq!(db.document_count(), corpus.len() as u64);
        assert_eq!(db.id_of("mem://fox"), ids[0]);
        assert_eq!(db.uris(&[ids[1], ids[0], ids[0]]), vec!["mem://dog", "mem://fox"]);
    }
}
