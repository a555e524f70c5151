//! Index Module
//!
//! The positional inverted index as seen by the query side:
//! - Tagged positions with reserved sentinel occurrences
//! - The `IndexStore` contract every backend implements
//! - Phrase matching by positional intersection
//! - Document normalization into term -> positions maps

pub mod document;
mod phrase;
mod position;
mod store;

pub use document::{normalize, parse_document, Document, SpellingCorrector, MAX_INDEXED_BYTES};
pub use phrase::{contains_phrase, matches_phrase};
pub use position::{Position, METADATA_OCCURRENCE, SPELLING_VARIANT};
pub use store::IndexStore;
