//! # Sift Core
//!
//! Positional full-text index with a small boolean query language.
//!
//! - **Positional Inverted Index**: every term occurrence is stored with its offset;
//!   metadata values and spelling corrections add sentinel occurrences that are
//!   searchable but never take part in position arithmetic
//! - **Query Language**: terms, `"phrases"`, `key:value` metadata filters,
//!   `a+b` conjunction and `-a` negation, evaluated by streaming accumulation
//! - **Phrase Matching**: positional intersection over consecutive offsets
//! - **Ranking**: inverse collection frequency, so rare terms dominate
//! - **Snippets**: the fixed-width window of positions carrying the most query weight,
//!   with matched terms highlighted
//! - **Facets**: follow-up queries by format and by over-represented metadata
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use sift_core::{Document, SearchConfig, SearchEngine, SqliteIndex};
//!
//! // Open the index (uses the default platform-specific location)
//! let index = SqliteIndex::open(None)?;
//!
//! // Index a document
//! let mut meta = BTreeMap::new();
//! meta.insert("author".to_string(), "Ada Lovelace".to_string());
//! index.add_document(&Document::new("file:///notes.txt", "The analytical engine weaves", &meta))?;
//!
//! // Search
//! let engine = SearchEngine::new(&index, SearchConfig::default());
//! let page = engine.search("\"analytical engine\" author:ada_lovelace", 0)?;
//! for hit in page.hits {
//!     println!("{} {:.3} {}", hit.doc, hit.score, hit.snippet);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): Compile SQLite into the binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod index;
pub mod query;
pub mod search;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Configuration
pub use config::{default_db_path, SearchConfig, DB_PATH_ENV, DEFAULT_PER_PAGE};

// Index model and store contract
pub use index::{
    contains_phrase, matches_phrase, normalize, parse_document, Document, IndexStore, Position,
    SpellingCorrector, MAX_INDEXED_BYTES, METADATA_OCCURRENCE, SPELLING_VARIANT,
};

// Query language
pub use query::{get_results, tokenize, word_only_tokenize, QueryEvaluator, Token};

// Ranking, snippets and the search pipeline
pub use search::{
    best_window_start, bold_summary, collect_facets, generate_summary, inverse_term_frequency,
    rank_documents, sort_ranked, Facet, FacetLink, HighlightMarkers, SearchEngine, SearchHit,
    SearchPage, DEFAULT_SNIPPET_LENGTH, FACETS,
};

// Storage backends
pub use storage::{
    DocumentRecord, IndexStats, MemoryIndex, Result, SqliteIndex, StorageError,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Document, IndexStore, MemoryIndex, Result, SearchConfig, SearchEngine, SearchHit,
        SearchPage, SqliteIndex, StorageError,
    };
}
