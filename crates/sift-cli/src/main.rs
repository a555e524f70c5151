//! Sift CLI
//!
//! Command-line interface for indexing files and querying them.

mod media;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use sift_core::{
    Document, Facet, FacetLink, HighlightMarkers, IndexStore, SearchConfig, SearchEngine,
    SqliteIndex, DEFAULT_PER_PAGE, DEFAULT_SNIPPET_LENGTH,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::media::{file_uri, load_file, parse_key_val};

/// Sift - positional full-text search
#[derive(Parser)]
#[command(name = "sift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Index files and search them with a small boolean query language")]
#[command(long_about = "Index files and search them with a small boolean query language.\n\nQueries combine words, \"quoted phrases\", key:value metadata filters,\na+b conjunction and -a negation.")]
struct Cli {
    /// Index database path (defaults to $SIFT_DB_PATH, then the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index files, replacing earlier versions of the same files
    Index {
        /// Files to index
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Extra metadata for every file (repeatable)
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        meta: Vec<(String, String)>,
    },

    /// Run a query and print ranked, highlighted results
    Search {
        /// Query string
        query: String,
        /// Result page, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
        /// Results per page
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: usize,
        /// Snippet width in words
        #[arg(long, default_value_t = DEFAULT_SNIPPET_LENGTH)]
        snippet_length: u32,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Also print refinement suggestions
        #[arg(long)]
        facets: bool,
    },

    /// Show the indexed text and metadata of a document
    Show {
        /// Document id
        id: i64,
    },

    /// Remove a document by URI or file path
    Remove {
        /// Stored URI, or the path of an indexed file
        uri: String,
    },

    /// Show index statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr so result output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let index = SqliteIndex::open(cli.db).context("failed to open index")?;

    match cli.command {
        Commands::Index { files, meta } => run_index(&index, files, meta),
        Commands::Search {
            query,
            page,
            per_page,
            snippet_length,
            json,
            facets,
        } => run_search(&index, &query, page, per_page, snippet_length, json, facets),
        Commands::Show { id } => run_show(&index, id),
        Commands::Remove { uri } => run_remove(&index, &uri),
        Commands::Stats => run_stats(&index),
    }
}

/// Run index command
fn run_index(index: &SqliteIndex, files: Vec<PathBuf>, meta: Vec<(String, String)>) -> anyhow::Result<()> {
    let extra: BTreeMap<String, String> = meta.into_iter().collect();

    let mut indexed = 0usize;
    let mut failed = 0usize;
    for path in &files {
        let loaded = match load_file(path, &extra) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("Skipping {}: {:#}", path.display(), e);
                failed += 1;
                continue;
            }
        };

        let doc = Document::new(loaded.uri, &loaded.text, &loaded.metadata);
        let id = index.add_document(&doc)?;
        println!("{} {} {}", "indexed".green(), format!("#{id}").dimmed(), doc.uri);
        indexed += 1;
    }

    println!();
    println!("{}: {}", "Indexed".white().bold(), indexed);
    if failed > 0 {
        println!("{}: {}", "Skipped".yellow().bold(), failed);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonHit<'a> {
    id: i64,
    uri: Option<String>,
    score: f64,
    snippet: &'a str,
}

#[derive(Serialize)]
struct JsonFacet {
    title: &'static str,
    links: Vec<FacetLink>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonResults<'a> {
    query: &'a str,
    total: usize,
    page: usize,
    per_page: usize,
    hits: Vec<JsonHit<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    facets: Option<Vec<JsonFacet>>,
}

/// Run search command
#[allow(clippy::too_many_arguments)]
fn run_search(
    index: &SqliteIndex,
    query: &str,
    page: usize,
    per_page: usize,
    snippet_length: u32,
    json: bool,
    show_facets: bool,
) -> anyhow::Result<()> {
    if page == 0 {
        anyhow::bail!("Pages start at 1");
    }
    if per_page == 0 {
        anyhow::bail!("--per-page must be at least 1");
    }

    let markers = if json || !colored::control::SHOULD_COLORIZE.should_colorize() {
        HighlightMarkers::default()
    } else {
        HighlightMarkers::new("\x1b[1;33m", "\x1b[0m")
    };
    let config = SearchConfig {
        snippet_length,
        per_page,
        markers,
    };
    let engine = SearchEngine::new(index, config);

    let ranked = engine.rank(query)?;
    let facets: Option<Vec<(Facet, Vec<FacetLink>)>> = if show_facets {
        Some(engine.facets(query, &ranked)?)
    } else {
        None
    };
    let results = engine.paginate(query, ranked, page - 1)?;

    if json {
        let mut hits = Vec::with_capacity(results.hits.len());
        for hit in &results.hits {
            hits.push(JsonHit {
                id: hit.doc,
                uri: index.get_document_uri(hit.doc)?,
                score: hit.score,
                snippet: &hit.snippet,
            });
        }
        let output = JsonResults {
            query,
            total: results.total,
            page,
            per_page,
            hits,
            facets: facets.map(|f| {
                f.into_iter()
                    .map(|(facet, links)| JsonFacet {
                        title: facet.title(),
                        links,
                    })
                    .collect()
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let pages = results.total.div_ceil(per_page).max(1);
    println!("{}", format!("=== Sift: {query} ===").cyan().bold());
    println!(
        "{}",
        format!("{} results, page {} of {}", results.total, page, pages).dimmed()
    );
    println!();

    if results.hits.is_empty() {
        println!("{}", "No matching documents.".dimmed());
    }

    for (i, hit) in results.hits.iter().enumerate() {
        let rank = (page - 1) * per_page + i + 1;
        let uri = index
            .get_document_uri(hit.doc)?
            .unwrap_or_else(|| "<unknown>".to_string());
        println!(
            "{}. {} {} {}",
            rank,
            uri.white().bold(),
            format!("#{}", hit.doc).dimmed(),
            format!("{:.4}", hit.score).green()
        );
        if !hit.snippet.is_empty() {
            println!("   {}", hit.snippet);
        }
    }

    if let Some(facets) = facets {
        for (facet, links) in facets {
            println!();
            println!("{}", format!("=== {} ===", facet.title()).yellow().bold());
            for link in links {
                println!("  {:<20} {}", link.label, link.query.dimmed());
            }
        }
    }

    if results.has_next() {
        println!();
        println!("{}", format!("More results: --page {}", page + 1).dimmed());
    }
    Ok(())
}

/// Run show command
fn run_show(index: &SqliteIndex, id: i64) -> anyhow::Result<()> {
    let Some(record) = index.get_document(id)? else {
        anyhow::bail!("No document with id {id}");
    };

    println!("{}", format!("=== Document #{} ===", record.id).cyan().bold());
    println!("{}: {}", "URI".white().bold(), record.uri);
    println!(
        "{}: {}",
        "Indexed".white().bold(),
        record.indexed_at.format("%Y-%m-%d %H:%M:%S")
    );

    if !record.metadata.is_empty() {
        println!();
        println!("{}", "=== Metadata ===".yellow().bold());
        for (key, value) in &record.metadata {
            println!("  {}: {}", key.white().bold(), value);
        }
    }

    println!();
    println!("{}", "=== Text ===".yellow().bold());
    let text = index.reconstruct_document(&record.id)?;
    if text.is_empty() {
        println!("{}", "(no indexed body)".dimmed());
    } else {
        println!("{text}");
    }
    Ok(())
}

/// Run remove command
fn run_remove(index: &SqliteIndex, uri: &str) -> anyhow::Result<()> {
    // Accept both stored URIs and paths to indexed files
    let mut removed = index.remove_document(uri)?;
    if !removed {
        if let Ok(path) = std::fs::canonicalize(uri) {
            removed = index.remove_document(&file_uri(&path))?;
        }
    }

    if !removed {
        anyhow::bail!("No document indexed under {uri}");
    }
    println!("{} {}", "removed".red(), uri);
    Ok(())
}

/// Run stats command
fn run_stats(index: &SqliteIndex) -> anyhow::Result<()> {
    let stats = index.stats()?;

    println!("{}", "=== Sift Index Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Database".white().bold(), index.path().display());
    println!("{}: {}", "Documents".white().bold(), stats.documents);
    println!("{}: {}", "Distinct Terms".white().bold(), stats.terms);
    println!("{}: {}", "Postings".white().bold(), stats.postings);
    println!("{}: {}", "Positions".white().bold(), stats.locations);
    println!("{}: {}", "Metadata Pairs".white().bold(), stats.metadata_pairs);

    let avg = if stats.documents > 0 {
        stats.locations as f64 / stats.documents as f64
    } else {
        0.0
    };
    println!("{}: {:.1}", "Avg Positions/Document".white().bold(), avg);
    Ok(())
}
