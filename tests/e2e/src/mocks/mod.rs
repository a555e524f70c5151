//! Test data: fixture documents and corpora


pub use fixtures::{Fixture, FixtureCorpus};
