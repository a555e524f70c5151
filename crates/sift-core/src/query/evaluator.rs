//! Query evaluation
//!
//! Grammar:
//!
//! ```text
//! QUERY   := NOTBOOL (repeated until the tokens run out)
//! NOTBOOL := '-' ANDBOOL | ANDBOOL
//! ANDBOOL := META ('+' ANDBOOL)?
//! META    := WORD ':' WORD | STRING
//! STRING  := '"' PHRASE '"'? | WORD
//! ```
//!
//! There is no syntax tree. Each production takes the remaining tokens and the
//! candidate list built so far, and returns the tokens it did not consume with
//! the updated list. Clauses therefore compose left to right: a negated clause
//! only filters what has accumulated before it, and a later positive clause can
//! bring a filtered document back.
//!
//! The grammar is total. Stray operators are skipped, a missing closing quote is
//! tolerated, and every production consumes at least one token, so evaluation
//! always terminates. Only the index store can fail.

use std::collections::HashSet;
use std::hash::Hash;

use super::tokenizer::{tokenize, Token};
use crate::index::IndexStore;
use crate::storage::Result;

/// Unconsumed tokens and the candidate list after one production
type Step<'t, D> = Result<(&'t [Token], Vec<D>)>;

/// Documents of `a` also in `b`, deduplicated, in `a`'s order.
fn intersect<D: Clone + Eq + Hash>(a: Vec<D>, b: &[D]) -> Vec<D> {
    let b: HashSet<&D> = b.iter().collect();
    let mut seen = HashSet::new();
    a.into_iter()
        .filter(|d| b.contains(d) && seen.insert(d.clone()))
        .collect()
}

/// Evaluates queries against an index store.
pub struct QueryEvaluator<'s, S: IndexStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: IndexStore + ?Sized> QueryEvaluator<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Tokenize and evaluate `query`.
    ///
    /// The returned candidate list may hold duplicates.
    pub fn evaluate(&self, query: &str) -> Result<Vec<S::DocId>> {
        let tokens = tokenize(query);
        let docs = self.evaluate_tokens(&tokens)?;
        tracing::debug!(
            "Query {:?}: {} tokens, {} candidates",
            query,
            tokens.len(),
            docs.len()
        );
        Ok(docs)
    }

    /// Evaluate an already tokenized query.
    pub fn evaluate_tokens(&self, tokens: &[Token]) -> Result<Vec<S::DocId>> {
        self.query(tokens, Vec::new())
    }

    fn query(&self, mut tokens: &[Token], mut docs: Vec<S::DocId>) -> Result<Vec<S::DocId>> {
        while !tokens.is_empty() {
            (tokens, docs) = self.not_bool(tokens, docs)?;
        }
        Ok(docs)
    }

    fn not_bool<'t>(&self, tokens: &'t [Token], mut docs: Vec<S::DocId>) -> Step<'t, S::DocId> {
        match tokens {
            [Token::Minus, next, ..] if !next.is_operator() => {
                let (rest, negated) = self.and_bool(&tokens[1..], Vec::new())?;
                let negated: HashSet<S::DocId> = negated.into_iter().collect();
                docs.retain(|d| !negated.contains(d));
                Ok((rest, docs))
            }
            _ => self.and_bool(tokens, docs),
        }
    }

    fn and_bool<'t>(&self, tokens: &'t [Token], mut docs: Vec<S::DocId>) -> Step<'t, S::DocId> {
        let (rest, a) = self.meta(tokens, Vec::new())?;

        match rest {
            [Token::Plus, next, ..] if !next.is_operator() => {
                // right-associative: a+b+c is a+(b+c)
                let (rest, b) = self.and_bool(&rest[1..], Vec::new())?;
                docs.extend(intersect(a, &b));
                Ok((rest, docs))
            }
            _ => {
                docs.extend(a);
                Ok((rest, docs))
            }
        }
    }

    fn meta<'t>(&self, tokens: &'t [Token], mut docs: Vec<S::DocId>) -> Step<'t, S::DocId> {
        match tokens {
            [Token::Word(key), Token::Colon, Token::Word(value), ..] => {
                docs.extend(self.store.find_documents_for_metadata(key, value)?);
                Ok((&tokens[3..], docs))
            }
            _ => self.string(tokens, docs),
        }
    }

    fn string<'t>(&self, tokens: &'t [Token], docs: Vec<S::DocId>) -> Step<'t, S::DocId> {
        match tokens {
            [Token::Quote, rest @ ..] => {
                let (rest, docs) = self.phrase(rest, docs)?;
                match rest {
                    [Token::Quote, after @ ..] => Ok((after, docs)),
                    _ => Ok((rest, docs)),
                }
            }
            _ => self.word(tokens, docs),
        }
    }

    /// The words after an opening quote.
    ///
    /// A closing quote ends the run. Any other operator ends it one word early,
    /// leaving that word for the operator's own production (`"a b c:d` is the
    /// phrase `a b` followed by the metadata filter `c:d`). Matches go in front
    /// of the incoming list.
    fn phrase<'t>(&self, tokens: &'t [Token], docs: Vec<S::DocId>) -> Step<'t, S::DocId> {
        let end = match tokens.iter().position(Token::is_operator) {
            None => tokens.len(),
            Some(i) if tokens[i] == Token::Quote => i,
            Some(i) => i.saturating_sub(1),
        };

        let words: Vec<String> = tokens[..end]
            .iter()
            .filter_map(|t| t.as_word().map(String::from))
            .collect();

        let mut found = self.store.documents_with_phrase(&words)?;
        found.extend(docs);
        Ok((&tokens[end..], found))
    }

    fn word<'t>(&self, tokens: &'t [Token], mut docs: Vec<S::DocId>) -> Step<'t, S::DocId> {
        match tokens {
            [] => Ok((tokens, docs)),
            [Token::Word(term), rest @ ..] => {
                docs.extend(self.store.find_documents_for_term(term)?);
                Ok((rest, docs))
            }
            // stray operator with no production of its own
            [_, rest @ ..] => Ok((rest, docs)),
        }
    }
}

/// Evaluate `query` against `store`.
pub fn get_results<S: IndexStore + ?Sized>(query: &str, store: &S) -> Result<Vec<S::DocId>> {
    QueryEvaluator::new(store).evaluate(query)
}
