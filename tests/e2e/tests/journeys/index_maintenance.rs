//! Journey: keeping an index up to date
//!
//! Re-indexing, removal, persistence across reopen, full-text reconstruction
//! and the indexer's sentinel occurrences, all through the SQLite store.

use std::collections::{BTreeMap, HashMap};

use sift_core::{
    get_results, parse_document, Document, IndexStore, Position, SpellingCorrector,
    MAX_INDEXED_BYTES,
};
use sift_e2e_tests::{FixtureCorpus, TestIndexManager};

#[test]
fn test_reindexing_replaces_the_old_version() {
    let db = TestIndexManager::new_temp();
    let first = db.add_text("mem://a", "old words here", &[("status", "draft")]);
    let second = db.add_text("mem://a", "new words here", &[("status", "final")]);

    assert_ne!(first, second);
    assert_eq!(db.document_count(), 1);
    assert!(get_results("old", &db.index).unwrap().is_empty());
    assert!(get_results("status:draft", &db.index).unwrap().is_empty());
    assert_eq!(get_results("new", &db.index).unwrap(), vec![second]);
    assert_eq!(get_results("status:final", &db.index).unwrap(), vec![second]);
}

#[test]
fn test_removal_clears_every_lookup() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let fox = db.id_of("mem://fox");

    assert!(db.index.remove_document("mem://fox").unwrap());
    assert!(!db.index.remove_document("mem://fox").unwrap());

    assert_eq!(db.document_count(), 6);
    assert!(!get_results("jumps", &db.index).unwrap().contains(&fox));
    assert!(!get_results("author:aesop", &db.index).unwrap().contains(&fox));
    assert_eq!(db.index.frequency(&fox, "fox").unwrap(), 0);
    assert!(db.index.get_term_locations("fox", &fox).unwrap().is_empty());
    assert_eq!(db.index.reconstruct_document(&fox).unwrap(), "");

    // corpus totals drop with it
    assert_eq!(db.index.total_frequency("jumps").unwrap(), 0);
}

#[test]
fn test_index_survives_reopen() {
    let mut db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let before = db.uris(&get_results("quick -lazy", &db.index).unwrap());

    db.reopen();

    assert_eq!(db.document_count(), 7);
    let after = db.uris(&get_results("quick -lazy", &db.index).unwrap());
    assert_eq!(before, after);
    assert_eq!(after, vec!["mem://speed"]);
}

#[test]
fn test_reconstruction_reproduces_normalized_text() {
    let db = TestIndexManager::new_temp();
    let corpus = FixtureCorpus::library();
    let ids = db.seed(&corpus);

    for (fixture, id) in corpus.fixtures.iter().zip(ids) {
        let text = db.index.reconstruct_document(&id).unwrap();
        assert_eq!(parse_document(&text), parse_document(&fixture.text), "{}", fixture.uri);
    }

    let fox = db.id_of("mem://fox");
    assert_eq!(
        db.index.reconstruct_partial_document(&fox, 1, 3).unwrap(),
        "quick brown fox"
    );
    assert_eq!(db.index.reconstruct_partial_document(&fox, 3, 1).unwrap(), "");
}

#[test]
fn test_metadata_round_trip() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let speed = db.id_of("mem://speed");

    let metadata = db.index.find_metadata_for_document(&speed).unwrap();
    assert_eq!(metadata.get("author").map(String::as_str), Some("john_smith"));
    assert_eq!(metadata.get("media").map(String::as_str), Some("text"));

    let record = db.index.get_document(speed).unwrap().unwrap();
    assert_eq!(record.uri, "mem://speed");
    assert_eq!(record.metadata, metadata);
}

struct Misspellings;

impl SpellingCorrector for Misspellings {
    fn correct(&self, term: &str, _doc_terms: &HashMap<String, usize>) -> Option<String> {
        match term {
            "recieve" => Some("receive".to_string()),
            "teh" => Some("the".to_string()),
            _ => None,
        }
    }
}

#[test]
fn test_spelling_variants_are_findable_but_not_positional() {
    let db = TestIndexManager::new_temp();
    let doc = Document::index(
        "mem://typos",
        "please recieve teh parcel",
        &BTreeMap::new(),
        Some(&Misspellings),
    );
    let id = db.index.add_document(&doc).unwrap();

    assert_eq!(get_results("receive", &db.index).unwrap(), vec![id]);
    assert_eq!(get_results("recieve", &db.index).unwrap(), vec![id]);
    assert_eq!(
        db.index.get_term_locations("receive", &id).unwrap(),
        vec![Position::SpellingVariant]
    );

    // the correction never stands in for the literal word
    assert!(get_results("\"please receive\"", &db.index).unwrap().is_empty());
    assert_eq!(get_results("\"please recieve\"", &db.index).unwrap(), vec![id]);
    assert_eq!(
        db.index.reconstruct_document(&id).unwrap(),
        "please recieve teh parcel"
    );
}

#[test]
fn test_oversized_documents_are_truncated() {
    let db = TestIndexManager::new_temp();
    let mut text = "pad ".repeat(MAX_INDEXED_BYTES / 4);
    text.push_str("beyondthelimit");
    db.add_text("mem://big", &text, &[]);

    assert_eq!(get_results("pad", &db.index).unwrap().len(), 1);
    assert!(get_results("beyondthelimit", &db.index).unwrap().is_empty());
}

#[test]
fn test_stats_track_the_corpus() {
    let db = TestIndexManager::new_temp();
    assert_eq!(db.index.stats().unwrap().documents, 0);

    db.seed(&FixtureCorpus::library());
    let stats = db.index.stats().unwrap();
    assert_eq!(stats.documents, 7);
    assert!(stats.terms > 0);
    assert!(stats.postings >= stats.terms);
    assert!(stats.locations >= stats.postings);
    assert!(stats.metadata_pairs > 0);
}
