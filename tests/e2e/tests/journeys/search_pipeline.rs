//! Journey: from a query to a page of highlighted results
//!
//! Exercises ranking, paging, snippet windows and highlighting through the
//! search engine on top of the SQLite store.

use sift_core::{HighlightMarkers, SearchConfig, SearchEngine};
use sift_e2e_tests::{FixtureCorpus, TestIndexManager};

#[test]
fn test_repeated_term_ranks_first() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let engine = SearchEngine::new(&db.index, SearchConfig::default());

    let page = engine.search("speed", 0).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.hits[0].doc, db.id_of("mem://speed"));
    assert_eq!(page.hits[1].doc, db.id_of("mem://rust"));

    // speed: 2 of 3 occurrences, rust: 1 of 3
    assert!((page.hits[0].score - 2.0 / 3.0).abs() < 1e-9);
    assert!((page.hits[1].score - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_rare_terms_outrank_common_ones() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let engine = SearchEngine::new(&db.index, SearchConfig::default());

    // "rust" occurs once in the whole corpus, "quick" three times
    let page = engine.search("quick rust", 0).unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.hits[0].doc, db.id_of("mem://rust"));
    assert!(page.hits[1..].iter().all(|h| h.score < page.hits[0].score));
}

#[test]
fn test_snippet_centers_on_the_dense_cluster() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::essay());
    let engine = SearchEngine::new(&db.index, SearchConfig::default());

    let page = engine.search("needle thread", 0).unwrap();
    assert_eq!(page.hits.len(), 1);

    let snippet = &page.hits[0].snippet;
    assert_eq!(snippet.split(' ').count(), 20);
    assert!(snippet.contains("<b>needle</b> <b>thread</b> <b>needle</b>"));
    assert!(!snippet.contains("filler"));
}

#[test]
fn test_highlighting_is_case_insensitive_and_configurable() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let config = SearchConfig {
        markers: HighlightMarkers::new("[", "]"),
        ..SearchConfig::default()
    };
    let engine = SearchEngine::new(&db.index, config);

    let page = engine.search("RUST Safety", 0).unwrap();
    assert_eq!(page.hits.len(), 1);
    assert_eq!(
        page.hits[0].snippet,
        "[rust] is a systems programming language focused on [safety] and speed"
    );
}

#[test]
fn test_metadata_only_hits_have_empty_snippets() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let engine = SearchEngine::new(&db.index, SearchConfig::default());

    let page = engine.search("media:image", 0).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.hits[0].doc, db.id_of("mem://cat.png"));
    assert_eq!(page.hits[0].snippet, "");
}

#[test]
fn test_paging_through_ties() {
    let db = TestIndexManager::new_temp();
    let ids = db.seed(&FixtureCorpus::bulk(25));
    let config = SearchConfig {
        per_page: 10,
        ..SearchConfig::default()
    };
    let engine = SearchEngine::new(&db.index, config);

    let mut seen = Vec::new();
    for page in 0..3 {
        let results = engine.search("common", page).unwrap();
        assert_eq!(results.total, 25);
        assert_eq!(results.has_next(), page < 2);
        seen.extend(results.hits.iter().map(|h| h.doc));
    }

    // equal scores fall back to id order, so pages never overlap
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(seen, expected);

    assert!(engine.search("common", 3).unwrap().hits.is_empty());
}

#[test]
fn test_page_serializes_to_json() {
    let db = TestIndexManager::new_temp();
    db.seed(&FixtureCorpus::library());
    let engine = SearchEngine::new(&db.index, SearchConfig::default());

    let page = engine.search("lazy", 0).unwrap();
    let json = serde_json::to_value(&page).unwrap();

    assert_eq!(json["query"], "lazy");
    assert_eq!(json["total"], 2);
    assert_eq!(json["perPage"], 10);
    assert_eq!(json["hits"].as_array().unwrap().len(), 2);
    assert!(json["hits"][0]["snippet"]
        .as_str()
        .unwrap()
        .contains("<b>lazy</b>"));
}
