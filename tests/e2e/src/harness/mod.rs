//! Test harness: isolated on-disk indexes

mod db_manager;

pub use db_manager::TestIndexManager;
