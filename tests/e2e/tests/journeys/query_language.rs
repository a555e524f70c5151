//! Journey: writing queries against a persisted index
//!
//! Walks through every construct of the query language on the fixture
//! library: bare terms, metadata filters, phrases, conjunction, negation and
//! malformed input.

use sift_core::{get_results, QueryEvaluator};
use sift_e2e_tests::{FixtureCorpus, TestIndexManager};

fn library() -> TestIndexManager {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    db
}

fn uris(db: &TestIndexManager, query: &str) -> Vec<String> {
    let ids = get_results(query, &db.index).expect("query failed");
    db.uris(&ids)
}

#[test]
fn test_bare_terms() {
    let db = library();

    assert_eq!(uris(&db, "quick"), vec!["mem://dog", "mem://fox", "mem://speed"]);
    assert_eq!(uris(&db, "Quick!"), uris(&db, "quick"));
    assert!(uris(&db, "zebra").is_empty());

    // successive clauses accumulate
    assert_eq!(
        uris(&db, "python rust"),
        vec!["mem://python", "mem://rust"]
    );
}

#[test]
fn test_metadata_values_are_searchable_terms() {
    let db = library();

    assert_eq!(uris(&db, "aesop"), vec!["mem://dog", "mem://fox"]);
    assert_eq!(uris(&db, "song"), vec!["mem://song.mp3"]);
}

#[test]
fn test_metadata_filters() {
    let db = library();

    assert_eq!(uris(&db, "author:aesop"), vec!["mem://dog", "mem://fox"]);
    assert_eq!(uris(&db, "author:Aesop"), uris(&db, "author:aesop"));
    assert_eq!(uris(&db, "author:john_smith"), vec!["mem://speed"]);
    assert_eq!(uris(&db, "media:image"), vec!["mem://cat.png"]);

    // values are matched whole
    assert!(uris(&db, "author:john").is_empty());
}

#[test]
fn test_phrases() {
    let db = library();

    assert_eq!(uris(&db, "\"quick brown fox\""), vec!["mem://fox", "mem://speed"]);
    assert_eq!(uris(&db, "\"lazy dog\""), vec!["mem://dog", "mem://fox"]);
    assert!(uris(&db, "\"brown quick\"").is_empty());

    // metadata occurrences never form phrases
    assert!(uris(&db, "\"fox song\"").is_empty());

    // an unterminated quote still runs the phrase
    assert_eq!(uris(&db, "\"programming language"), vec!["mem://python", "mem://rust"]);
}

#[test]
fn test_conjunction() {
    let db = library();

    assert_eq!(uris(&db, "quick+lazy"), vec!["mem://dog", "mem://fox"]);
    assert_eq!(uris(&db, "quick+lazy"), uris(&db, "lazy+quick"));
    assert_eq!(uris(&db, "quick+brown+speed"), vec!["mem://speed"]);
    assert_eq!(uris(&db, "author:aesop+cat"), vec!["mem://dog"]);
    assert_eq!(uris(&db, "\"quick brown\"+matters"), vec!["mem://speed"]);
}

#[test]
fn test_negation() {
    let db = library();

    assert_eq!(uris(&db, "quick -lazy"), vec!["mem://speed"]);
    assert_eq!(
        uris(&db, "programming+language -author:guido"),
        vec!["mem://rust"]
    );

    // negation only filters what came before it
    assert!(uris(&db, "-lazy").is_empty());
    assert_eq!(
        uris(&db, "quick -lazy dog"),
        vec!["mem://dog", "mem://fox", "mem://speed"]
    );
}

#[test]
fn test_malformed_queries_degrade_gracefully() {
    let db = library();

    for query in ["", "+", "-", ":", "\"", "\"\"", "+-:\"", "a:", ":b", "quick+", "quick -"] {
        assert!(
            get_results(query, &db.index).is_ok(),
            "query {query:?} should evaluate"
        );
    }

    assert_eq!(uris(&db, "+quick"), uris(&db, "quick"));
    assert!(uris(&db, "-").is_empty());
}

#[test]
fn test_evaluator_reuse_across_queries() {
    let db = library();
    let evaluator = QueryEvaluator::new(&db.index);

    let first = evaluator.evaluate("speed").unwrap();
    let second = evaluator.evaluate("speed").unwrap();
    assert_eq!(first, second);

    // one entry per matching posting, so duplicates survive evaluation
    let doubled = evaluator.evaluate("speed speed").unwrap();
    assert_eq!(doubled.len(), 2 * first.len());
}
