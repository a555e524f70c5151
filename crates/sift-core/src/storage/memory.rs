//! In-memory index store
//!
//! The same contract as the SQLite store over plain maps. Used in-process,
//! and by tests and benchmarks, where durability is not wanted.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::Result;
use crate::index::{normalize, Document, IndexStore, Position};

/// Inverted index held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: BTreeMap<u32, Document>,
    by_uri: HashMap<String, u32>,
    // term -> doc -> positions
    postings: HashMap<String, BTreeMap<u32, Vec<Position>>>,
    // (key, value) -> docs
    metadata: HashMap<(String, String), BTreeSet<u32>>,
    next_id: u32,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document, replacing any earlier document with the same URI.
    pub fn add_document(&mut self, doc: Document) -> u32 {
        self.remove_document(&doc.uri);

        let id = self.next_id;
        self.next_id += 1;

        for (term, positions) in &doc.words {
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(id, positions.clone());
        }
        for (key, value) in &doc.metadata {
            self.metadata
                .entry((key.clone(), value.clone()))
                .or_default()
                .insert(id);
        }

        self.by_uri.insert(doc.uri.clone(), id);
        self.docs.insert(id, doc);
        id
    }

    /// Delete the document stored under `uri`. Returns whether it existed.
    pub fn remove_document(&mut self, uri: &str) -> bool {
        let Some(id) = self.by_uri.remove(uri) else {
            return false;
        };
        let Some(doc) = self.docs.remove(&id) else {
            return false;
        };

        for term in doc.words.keys() {
            if let Some(docs) = self.postings.get_mut(term) {
                docs.remove(&id);
                if docs.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
        for pair in doc.metadata {
            if let Some(docs) = self.metadata.get_mut(&pair) {
                docs.remove(&id);
                if docs.is_empty() {
                    self.metadata.remove(&pair);
                }
            }
        }
        true
    }

    /// Id of the document stored under `uri`.
    pub fn document_id_for_uri(&self, uri: &str) -> Option<u32> {
        self.by_uri.get(uri).copied()
    }

    pub fn get_document(&self, id: u32) -> Option<&Document> {
        self.docs.get(&id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl IndexStore for MemoryIndex {
    type DocId = u32;

    fn find_documents_for_term(&self, term: &str) -> Result<Vec<u32>> {
        Ok(self
            .postings
            .get(term)
            .map(|docs| docs.keys().copied().collect())
            .unwrap_or_default())
    }

    fn find_documents_for_metadata(&self, key: &str, value: &str) -> Result<Vec<u32>> {
        let pair = (normalize(key), normalize(value));
        Ok(self
            .metadata
            .get(&pair)
            .map(|docs| docs.iter().copied().collect())
            .unwrap_or_default())
    }

    fn frequency(&self, doc: &u32, term: &str) -> Result<u64> {
        Ok(self
            .postings
            .get(term)
            .and_then(|docs| docs.get(doc))
            .map_or(0, |positions| positions.len() as u64))
    }

    fn total_frequency(&self, term: &str) -> Result<u64> {
        Ok(self
            .postings
            .get(term)
            .map_or(0, |docs| docs.values().map(|p| p.len() as u64).sum()))
    }

    fn get_term_locations(&self, term: &str, doc: &u32) -> Result<Vec<Position>> {
        Ok(self
            .postings
            .get(term)
            .and_then(|docs| docs.get(doc))
            .cloned()
            .unwrap_or_default())
    }

    fn reconstruct_partial_document(&self, doc: &u32, start: u32, end: u32) -> Result<String> {
        let Some(document) = self.docs.get(doc) else {
            return Ok(String::new());
        };

        let mut by_offset: BTreeMap<u32, &str> = BTreeMap::new();
        for (term, positions) in &document.words {
            for offset in positions.iter().filter_map(|p| p.literal()) {
                if (start..=end).contains(&offset) {
                    by_offset.insert(offset, term);
                }
            }
        }
        Ok(by_offset.into_values().collect::<Vec<_>>().join(" "))
    }

    fn find_metadata_for_document(&self, doc: &u32) -> Result<BTreeMap<String, String>> {
        Ok(self
            .docs
            .get(doc)
            .map(|d| d.metadata.clone())
            .unwrap_or_default())
    }

    fn count_documents(&self) -> Result<u64> {
        Ok(self.docs.len() as u64)
    }
}
