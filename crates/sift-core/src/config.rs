//! Search configuration
//!
//! Defaults for paging, snippet width and highlight markup, plus where the
//! index lives on disk when no path is given.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::search::{HighlightMarkers, DEFAULT_SNIPPET_LENGTH};

/// Overrides the default database location
pub const DB_PATH_ENV: &str = "SIFT_DB_PATH";

/// Results per page unless configured otherwise
pub const DEFAULT_PER_PAGE: usize = 10;

/// Query-time settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Snippet window width in term positions
    pub snippet_length: u32,
    /// Hits per result page
    pub per_page: usize,
    /// Markup wrapped around matched snippet words
    pub markers: HighlightMarkers,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            per_page: DEFAULT_PER_PAGE,
            markers: HighlightMarkers::default(),
        }
    }
}

/// Default index location: `$SIFT_DB_PATH`, else the platform data directory.
pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let proj_dirs = ProjectDirs::from("org", "sift", "sift")?;
    Some(proj_dirs.data_dir().join("sift.db"))
}
