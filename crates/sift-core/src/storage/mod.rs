//! Storage Module
//!
//! Index store backends:
//! - SQLite store with versioned migrations and reader/writer connections
//! - In-memory store over plain maps

mod memory;
mod migrations;
mod sqlite;

pub use memory::MemoryIndex;
pub use migrations::{Migration, MIGRATIONS};
pub use sqlite::{DocumentRecord, IndexStats, Result, SqliteIndex, StorageError};
