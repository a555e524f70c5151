//! Search Module
//!
//! Everything after candidate retrieval:
//! - Inverse collection frequency ranking
//! - Best-window snippet extraction
//! - Query term highlighting
//! - Refinement facets
//! - The end-to-end search pipeline

mod engine;
mod facets;
mod highlight;
mod ranker;
mod snippet;

pub use engine::{SearchEngine, SearchHit, SearchPage};
pub use facets::{collect_facets, Facet, FacetLink, FACETS};
pub use highlight::{bold_summary, HighlightMarkers};
pub use ranker::{inverse_term_frequency, rank_documents, sort_ranked};
pub use snippet::{best_window_start, generate_summary, location_worth, DEFAULT_SNIPPET_LENGTH};
