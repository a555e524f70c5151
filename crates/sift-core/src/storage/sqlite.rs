//! SQLite Storage Implementation
//!
//! Positional inverted index persisted in SQLite. Terms, metadata pairs and
//! documents live in their own tables; every occurrence is a row in
//! `term_doc_location`, and `term_document_map` caches per-document counts.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use lru::LruCache;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::{Deserialize, Serialize};

use crate::config::default_db_path;
use crate::index::{normalize, Document, IndexStore, Position};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A stored position outside the literal and sentinel ranges
    #[error("Invalid stored position: {0}")]
    InvalidPosition(i64),
    /// A connection or cache mutex was poisoned by a panicking thread
    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Capacity of the term -> id lookup cache
const TERM_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(4096) {
    Some(n) => n,
    None => panic!("term cache size must be non-zero"),
};

/// A stored document's bookkeeping row plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: i64,
    pub uri: String,
    pub indexed_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

/// Index size counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub documents: u64,
    pub terms: u64,
    pub postings: u64,
    pub locations: u64,
    pub metadata_pairs: u64,
}

// ============================================================================
// STORAGE
// ============================================================================

/// SQLite-backed index store
///
/// Uses separate reader/writer connections for interior mutability.
/// All methods take `&self`, so the index is `Send + Sync` and can be
/// shared as `Arc<SqliteIndex>` across concurrent queries.
pub struct SqliteIndex {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    term_cache: Mutex<LruCache<String, i64>>,
    path: PathBuf,
}

impl SqliteIndex {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Open (or create) an index. `None` uses the default location.
    pub fn open(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => default_db_path().ok_or_else(|| {
                StorageError::Init("Could not determine data directory".to_string())
            })?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Open writer connection and bring the schema up to date
        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;
        super::migrations::apply_migrations(&writer_conn)?;

        // Open reader connection to same path
        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        tracing::debug!("Opened index at {}", path.display());

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            term_cache: Mutex::new(LruCache::new(TERM_CACHE_SIZE)),
            path,
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn reader(&self) -> Result<MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::LockPoisoned("reader"))
    }

    fn writer(&self) -> Result<MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::LockPoisoned("writer"))
    }

    /// Term id on the read path, through the LRU cache.
    fn term_id(&self, conn: &Connection, term: &str) -> Result<Option<i64>> {
        {
            let mut cache = self
                .term_cache
                .lock()
                .map_err(|_| StorageError::LockPoisoned("term cache"))?;
            if let Some(&id) = cache.get(term) {
                return Ok(Some(id));
            }
        }

        let id: Option<i64> = conn
            .query_row("SELECT id FROM terms WHERE term = ?1", params![term], |row| {
                row.get(0)
            })
            .optional()?;

        if let Some(id) = id {
            self.term_cache
                .lock()
                .map_err(|_| StorageError::LockPoisoned("term cache"))?
                .put(term.to_string(), id);
        }

        Ok(id)
    }

    fn get_or_create_term_id(tx: &Transaction<'_>, term: &str) -> Result<i64> {
        tx.prepare_cached("INSERT OR IGNORE INTO terms (term) VALUES (?1)")?
            .execute(params![term])?;
        let id = tx
            .prepare_cached("SELECT id FROM terms WHERE term = ?1")?
            .query_row(params![term], |row| row.get(0))?;
        Ok(id)
    }

    fn get_or_create_metadata_id(tx: &Transaction<'_>, key: &str, value: &str) -> Result<i64> {
        tx.prepare_cached(
            "INSERT OR IGNORE INTO metadata_dict (metadata_key, metadata_value) VALUES (?1, ?2)",
        )?
        .execute(params![key, value])?;
        let id = tx
            .prepare_cached(
                "SELECT id FROM metadata_dict WHERE metadata_key = ?1 AND metadata_value = ?2",
            )?
            .query_row(params![key, value], |row| row.get(0))?;
        Ok(id)
    }

    /// Store a document, replacing any earlier document with the same URI.
    ///
    /// The whole replacement happens in one transaction.
    pub fn add_document(&self, doc: &Document) -> Result<i64> {
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;

        tx.execute("DELETE FROM documents WHERE uri = ?1", params![doc.uri])?;
        tx.execute(
            "INSERT INTO documents (uri, dirty, indexed_at) VALUES (?1, ?2, ?3)",
            params![doc.uri, false, Utc::now()],
        )?;
        let doc_id = tx.last_insert_rowid();

        for (term, positions) in &doc.words {
            let term_id = Self::get_or_create_term_id(&tx, term)?;
            tx.prepare_cached(
                "INSERT INTO term_document_map (term, document, frequency) VALUES (?1, ?2, ?3)",
            )?
            .execute(params![term_id, doc_id, positions.len() as i64])?;

            let mut insert_location = tx.prepare_cached(
                "INSERT INTO term_doc_location (term, document, location) VALUES (?1, ?2, ?3)",
            )?;
            for position in positions {
                insert_location.execute(params![term_id, doc_id, position.to_raw()])?;
            }
        }

        for (key, value) in &doc.metadata {
            let metadata_id = Self::get_or_create_metadata_id(&tx, key, value)?;
            tx.prepare_cached(
                "INSERT INTO metadata_document_map (metadata_id, document_id) VALUES (?1, ?2)",
            )?
            .execute(params![metadata_id, doc_id])?;
        }

        tx.commit()?;

        tracing::info!(
            "Indexed {} as document {} ({} distinct terms)",
            doc.uri,
            doc_id,
            doc.words.len()
        );

        Ok(doc_id)
    }

    /// Delete every document stored under `uri`. Returns whether any existed.
    pub fn remove_document(&self, uri: &str) -> Result<bool> {
        let writer = self.writer()?;
        let removed = writer.execute("DELETE FROM documents WHERE uri = ?1", params![uri])?;
        if removed > 0 {
            tracing::info!("Removed {} ({} rows)", uri, removed);
        }
        Ok(removed > 0)
    }

    /// Id of the document stored under `uri`.
    pub fn document_id_for_uri(&self, uri: &str) -> Result<Option<i64>> {
        let reader = self.reader()?;
        let id = reader
            .query_row(
                "SELECT id FROM documents WHERE uri = ?1 ORDER BY id DESC LIMIT 1",
                params![uri],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// URI of document `doc_id`, if it exists.
    pub fn get_document_uri(&self, doc_id: i64) -> Result<Option<String>> {
        let reader = self.reader()?;
        let uri = reader
            .query_row(
                "SELECT uri FROM documents WHERE id = ?1",
                params![doc_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(uri)
    }

    /// Bookkeeping row and metadata of document `doc_id`.
    pub fn get_document(&self, doc_id: i64) -> Result<Option<DocumentRecord>> {
        let row: Option<(String, DateTime<Utc>)> = {
            let reader = self.reader()?;
            reader
                .query_row(
                    "SELECT uri, indexed_at FROM documents WHERE id = ?1",
                    params![doc_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?
        };

        let Some((uri, indexed_at)) = row else {
            return Ok(None);
        };

        Ok(Some(DocumentRecord {
            id: doc_id,
            uri,
            indexed_at,
            metadata: self.find_metadata_for_document(&doc_id)?,
        }))
    }

    /// Size counters for the whole index.
    pub fn stats(&self) -> Result<IndexStats> {
        let reader = self.reader()?;
        let count = |sql: &str| -> Result<u64> {
            let n: i64 = reader.query_row(sql, [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        };

        Ok(IndexStats {
            documents: count("SELECT COUNT(*) FROM documents")?,
            terms: count("SELECT COUNT(*) FROM terms")?,
            postings: count("SELECT COUNT(*) FROM term_document_map")?,
            locations: count("SELECT COUNT(*) FROM term_doc_location")?,
            metadata_pairs: count("SELECT COUNT(*) FROM metadata_dict")?,
        })
    }
}

impl IndexStore for SqliteIndex {
    type DocId = i64;

    fn find_documents_for_term(&self, term: &str) -> Result<Vec<i64>> {
        let reader = self.reader()?;
        let Some(term_id) = self.term_id(&reader, term)? else {
            return Ok(Vec::new());
        };

        let mut stmt =
            reader.prepare_cached("SELECT document FROM term_document_map WHERE term = ?1")?;
        let docs = stmt
            .query_map(params![term_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(docs)
    }

    fn find_documents_for_metadata(&self, key: &str, value: &str) -> Result<Vec<i64>> {
        let (key, value) = (normalize(key), normalize(value));
        let reader = self.reader()?;

        let mut stmt = reader.prepare_cached(
            "SELECT m.document_id FROM metadata_document_map m
             JOIN metadata_dict d ON d.id = m.metadata_id
             WHERE d.metadata_key = ?1 AND d.metadata_value = ?2",
        )?;
        let docs = stmt
            .query_map(params![key, value], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(docs)
    }

    fn frequency(&self, doc: &i64, term: &str) -> Result<u64> {
        let reader = self.reader()?;
        let Some(term_id) = self.term_id(&reader, term)? else {
            return Ok(0);
        };

        let frequency: Option<i64> = reader
            .prepare_cached(
                "SELECT frequency FROM term_document_map WHERE term = ?1 AND document = ?2",
            )?
            .query_row(params![term_id, doc], |row| row.get(0))
            .optional()?;
        Ok(frequency.unwrap_or(0).max(0) as u64)
    }

    fn total_frequency(&self, term: &str) -> Result<u64> {
        let reader = self.reader()?;
        let Some(term_id) = self.term_id(&reader, term)? else {
            return Ok(0);
        };

        let total: i64 = reader
            .prepare_cached(
                "SELECT COALESCE(SUM(frequency), 0) FROM term_document_map WHERE term = ?1",
            )?
            .query_row(params![term_id], |row| row.get(0))?;
        Ok(total.max(0) as u64)
    }

    fn get_term_locations(&self, term: &str, doc: &i64) -> Result<Vec<Position>> {
        let reader = self.reader()?;
        let Some(term_id) = self.term_id(&reader, term)? else {
            return Ok(Vec::new());
        };

        let mut stmt = reader.prepare_cached(
            "SELECT location FROM term_doc_location WHERE term = ?1 AND document = ?2",
        )?;
        let raw = stmt
            .query_map(params![term_id, doc], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;

        raw.into_iter()
            .map(|r| Position::from_raw(r).ok_or(StorageError::InvalidPosition(r)))
            .collect()
    }

    fn reconstruct_partial_document(&self, doc: &i64, start: u32, end: u32) -> Result<String> {
        if start > end {
            return Ok(String::new());
        }

        let reader = self.reader()?;
        let mut stmt = reader.prepare_cached(
            "SELECT t.term FROM term_doc_location l
             JOIN terms t ON t.id = l.term
             WHERE l.document = ?1 AND l.location >= ?2 AND l.location <= ?3
             ORDER BY l.location",
        )?;
        let terms = stmt
            .query_map(params![doc, i64::from(start), i64::from(end)], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(terms.join(" "))
    }

    fn find_metadata_for_document(&self, doc: &i64) -> Result<BTreeMap<String, String>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare_cached(
            "SELECT d.metadata_key, d.metadata_value FROM metadata_document_map m
             JOIN metadata_dict d ON d.id = m.metadata_id
             WHERE m.document_id = ?1",
        )?;
        let pairs = stmt
            .query_map(params![doc], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<String, String>>>()?;
        Ok(pairs)
    }

    fn count_documents(&self) -> Result<u64> {
        let reader = self.reader()?;
        let n: i64 = reader.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}
