//! Query Module
//!
//! The boolean query language: a tokenizer for the raw query string and a
//! recursive evaluator that resolves it against an index store.

mod evaluator;
mod tokenizer;

pub use evaluator::{get_results, QueryEvaluator};
pub use tokenizer::{tokenize, word_only_tokenize, Token, OPERATOR_CHARS};
