//! Search pipeline
//!
//! query -> candidates -> scores -> sorted page -> highlighted snippets

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

use super::facets::{collect_facets, Facet, FacetLink};
use super::highlight::bold_summary;
use super::ranker::{rank_documents, sort_ranked};
use super::snippet::generate_summary;
use crate::config::SearchConfig;
use crate::index::IndexStore;
use crate::query::QueryEvaluator;
use crate::storage::Result;

/// One ranked result with its highlighted snippet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<D> {
    pub doc: D,
    pub score: f64,
    pub snippet: String,
}

/// A page of results. `page` is 0-based; `total` counts every distinct match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<D> {
    pub query: String,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub hits: Vec<SearchHit<D>>,
}

impl<D> SearchPage<D> {
    /// Whether a page after this one has results. Zero-width pages never do.
    pub fn has_next(&self) -> bool {
        self.per_page > 0
            && (self.page + 1).saturating_mul(self.per_page) < self.total
    }
}

/// Runs queries against one store with fixed settings
pub struct SearchEngine<'s, S: IndexStore + ?Sized> {
    store: &'s S,
    config: SearchConfig,
}

impl<'s, S: IndexStore + ?Sized> SearchEngine<'s, S> {
    pub fn new(store: &'s S, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Evaluate `query` and score every distinct match.
    pub fn rank(&self, query: &str) -> Result<HashMap<S::DocId, f64>> {
        let start = Instant::now();

        let candidates = QueryEvaluator::new(self.store).evaluate(query)?;
        let ranked = rank_documents(query, &candidates, self.store)?;

        tracing::debug!(
            query,
            candidates = candidates.len(),
            matches = ranked.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "ranked query"
        );
        Ok(ranked)
    }

    /// Cut page `page` out of `ranked` and build a snippet for each hit.
    pub fn paginate(
        &self,
        query: &str,
        ranked: HashMap<S::DocId, f64>,
        page: usize,
    ) -> Result<SearchPage<S::DocId>> {
        let per_page = self.config.per_page;
        let total = ranked.len();
        let sorted = sort_ranked(ranked);

        let mut hits = Vec::new();
        for (doc, score) in sorted
            .into_iter()
            .skip(page.saturating_mul(per_page))
            .take(per_page)
        {
            let summary = generate_summary(query, &doc, self.store, self.config.snippet_length)?;
            let snippet = bold_summary(query, &summary, &self.config.markers);
            hits.push(SearchHit { doc, score, snippet });
        }

        Ok(SearchPage {
            query: query.to_string(),
            total,
            page,
            per_page,
            hits,
        })
    }

    /// One page of highlighted results for `query`.
    pub fn search(&self, query: &str, page: usize) -> Result<SearchPage<S::DocId>> {
        let ranked = self.rank(query)?;
        self.paginate(query, ranked, page)
    }

    /// Refinement links for a query and its ranked results.
    pub fn facets(
        &self,
        query: &str,
        ranked: &HashMap<S::DocId, f64>,
    ) -> Result<Vec<(Facet, Vec<FacetLink>)>> {
        collect_facets(query, ranked, self.store)
    }
}
