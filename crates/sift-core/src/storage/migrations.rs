//! Database Migrations
//!
//! Schema migration definitions for the SQLite index store.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: documents, metadata, terms, postings, locations",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Location index by document for snippet reconstruction",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uri TEXT NOT NULL,
    dirty BOOLEAN NOT NULL DEFAULT FALSE,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS document_uri_index ON documents(uri);

-- Distinct normalized key/value pairs
CREATE TABLE IF NOT EXISTS metadata_dict (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    metadata_key TEXT NOT NULL,
    metadata_value TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS metadata_dict_index ON metadata_dict(metadata_key, metadata_value);

CREATE TABLE IF NOT EXISTS metadata_document_map (
    metadata_id INTEGER NOT NULL REFERENCES metadata_dict(id) ON DELETE CASCADE,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS metadata_document_map_index ON metadata_document_map(metadata_id);
CREATE INDEX IF NOT EXISTS metadata_document_map_doc_index ON metadata_document_map(document_id);

-- Term dictionary. Ids are never reused (AUTOINCREMENT), so cached ids stay valid.
CREATE TABLE IF NOT EXISTS terms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    term TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS term_index ON terms(term);

-- One row per (term, document) with the occurrence count, sentinels included
CREATE TABLE IF NOT EXISTS term_document_map (
    term INTEGER NOT NULL REFERENCES terms(id) ON DELETE CASCADE,
    document INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    frequency INTEGER NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS term_document_map_index ON term_document_map(term, document);

-- One row per occurrence. -1 = spelling variant, -2 = metadata occurrence
CREATE TABLE IF NOT EXISTS term_doc_location (
    term INTEGER NOT NULL REFERENCES terms(id) ON DELETE CASCADE,
    document INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    location INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS term_document_location_index ON term_doc_location(term, document);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Reconstruction scans locations of one document by range
const MIGRATION_V2_UP: &str = r#"
CREATE INDEX IF NOT EXISTS term_doc_location_document_index ON term_doc_location(document, location);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (2, datetime('now'));
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
