//! Result refinements
//!
//! Each facet looks at a query and its ranked results and proposes follow-up
//! queries that narrow them. The set of facets is fixed and listed in
//! [`FACETS`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::index::IndexStore;
use crate::storage::Result;

/// Media clauses the format facet owns and rewrites
const MEDIA_EXCLUSIONS: [&str; 4] = ["-media:image", "-media:audio", "-media:video", "-media:text"];

/// Label and extra clauses for each format refinement, in display order
const FORMAT_REFINEMENTS: [(&str, &str); 5] = [
    ("All", ""),
    ("Text", "-media:image -media:audio -media:video -media:application"),
    ("Images", "-media:text -media:audio -media:video -media:application"),
    ("Audio", "-media:text -media:video -media:image -media:application"),
    ("Video", "-media:text -media:image -media:audio -media:application"),
];

/// Bounds on p(result | key:value) for a metadata pair to be worth offering
const MIN_METADATA_AFFINITY: f64 = 0.1;
const MAX_METADATA_AFFINITY: f64 = 1.0;

/// A suggested follow-up query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetLink {
    pub label: String,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    /// Restrict results to one media type
    Format,
    /// Narrow by metadata the results share unusually often
    Metadata,
}

/// Every facet, in display order
pub const FACETS: &[Facet] = &[Facet::Format, Facet::Metadata];

impl Facet {
    pub fn title(&self) -> &'static str {
        match self {
            Facet::Format => "Format",
            Facet::Metadata => "Filter By",
        }
    }

    pub fn links<S: IndexStore + ?Sized>(
        &self,
        query: &str,
        ranked: &HashMap<S::DocId, f64>,
        store: &S,
    ) -> Result<Vec<FacetLink>> {
        match self {
            Facet::Format => Ok(format_links(query)),
            Facet::Metadata => metadata_links(query, ranked, store),
        }
    }
}

/// Every facet with at least one link, paired with its links.
pub fn collect_facets<S: IndexStore + ?Sized>(
    query: &str,
    ranked: &HashMap<S::DocId, f64>,
    store: &S,
) -> Result<Vec<(Facet, Vec<FacetLink>)>> {
    let mut out = Vec::new();
    for facet in FACETS {
        let links = facet.links(query, ranked, store)?;
        if !links.is_empty() {
            out.push((*facet, links));
        }
    }
    Ok(out)
}

fn join_clauses(base: &str, extra: &str) -> String {
    base.split_whitespace()
        .chain(extra.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_links(query: &str) -> Vec<FacetLink> {
    let mut base = query.to_string();
    for clause in MEDIA_EXCLUSIONS {
        base = base.replace(clause, "");
    }

    FORMAT_REFINEMENTS
        .iter()
        .map(|(label, extra)| FacetLink {
            label: label.to_string(),
            query: join_clauses(&base, extra),
        })
        .collect()
}

fn metadata_links<S: IndexStore + ?Sized>(
    query: &str,
    ranked: &HashMap<S::DocId, f64>,
    store: &S,
) -> Result<Vec<FacetLink>> {
    if ranked.is_empty() || store.count_documents()? == 0 {
        return Ok(Vec::new());
    }

    let mut in_results: BTreeMap<(String, String), usize> = BTreeMap::new();
    for doc in ranked.keys() {
        for pair in store.find_metadata_for_document(doc)? {
            *in_results.entry(pair).or_default() += 1;
        }
    }

    let mut links = Vec::new();
    for ((key, value), count) in in_results {
        let with_pair = store.find_documents_for_metadata(&key, &value)?.len();
        if with_pair == 0 {
            continue;
        }

        // p(a|k) = p(k|a) * p(a) / p(k); the corpus and result sizes cancel,
        // which keeps pairs held only by results at exactly 1
        let affinity = count as f64 / with_pair as f64;

        if affinity > MIN_METADATA_AFFINITY && affinity < MAX_METADATA_AFFINITY {
            let clause = format!("{}:{}", key, value);
            links.push(FacetLink {
                query: join_clauses(query, &clause),
                label: clause,
            });
        }
    }
    Ok(links)
}
