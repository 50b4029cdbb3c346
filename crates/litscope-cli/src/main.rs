use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use litscope_core::{AuthorStore, Database, PaperStore};
use litscope_curation::pipeline;
use litscope_curation::providers::{GenderApiClient, GeocodingClient};
use litscope_curation::{CurationConfig, IdentityResolver};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "litscope",
    about = "Bibliometrics curator — author aggregates, dedup, h-index",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true, default_value = "litscope.db")]
    db: PathBuf,

    /// Path to a TOML config file with thresholds and provider endpoints.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attribute every paper to its authors, building author aggregates.
    Attribute,

    /// Recompute the h-index of every author.
    Hindex,

    /// List likely duplicate author pairs, best candidates first.
    Duplicates {
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Merge one author identity into another (keep survives).
    Merge { keep: String, remove: String },

    /// Provider-backed enrichment passes.
    Enrich {
        #[command(subcommand)]
        target: EnrichTarget,
    },

    /// Show collection counts.
    Stats,
}

#[derive(Subcommand)]
enum EnrichTarget {
    /// Infer author genders for papers that lack them.
    Gender,
    /// Resolve author affiliations to countries.
    Country,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CurationConfig::load(path)?,
        None => CurationConfig::default(),
    };
    let db = Database::open(&cli.db)?;

    match cli.command {
        Commands::Attribute => {
            let summary = pipeline::attribute_papers(&db, &db)?;
            println!(
                "papers: {} seen, {} attributed, {} skipped, {} failed",
                summary.papers_seen,
                summary.papers_attributed,
                summary.papers_skipped,
                summary.papers_failed
            );
            println!(
                "authors: {} created, {} updated, {} already attributed",
                summary.authors_created, summary.authors_updated, summary.already_attributed
            );
        }
        Commands::Hindex => {
            let updated = pipeline::refresh_h_indexes(&db)?;
            println!("h-index updated for {updated} authors");
        }
        Commands::Duplicates { limit } => {
            let resolver = IdentityResolver::new(config.matching.clone());
            let authors = db.scan_authors()?;
            let candidates = resolver.find_duplicate_candidates(&authors);
            for candidate in candidates.iter().take(limit) {
                println!(
                    "{:.3}  {} <> {}  (first {:.3}, last {:.3}, shared papers {})",
                    candidate.combined_score(),
                    candidate.left,
                    candidate.right,
                    candidate.first_name_score,
                    candidate.last_name_score,
                    candidate.shared_dois
                );
            }
            println!(
                "{} candidate pairs ({} shown)",
                candidates.len(),
                candidates.len().min(limit)
            );
        }
        Commands::Merge { keep, remove } => {
            let resolver = IdentityResolver::new(config.matching.clone());
            let merged = resolver.merge(&db, &keep, &remove)?;
            println!(
                "merged {remove} into {keep}: {} papers, {} citations, h-index {}",
                merged.papers, merged.total_citations, merged.h_index
            );
        }
        Commands::Enrich { target } => match target {
            EnrichTarget::Gender => {
                let provider = GenderApiClient::new(&config.gender_api);
                let summary = pipeline::enrich_genders(&db, &provider).await?;
                println!(
                    "genders: {} papers enriched, {} lookups failed",
                    summary.records_enriched, summary.lookups_failed
                );
            }
            EnrichTarget::Country => {
                let resolver = GeocodingClient::new(&config.geocoder);
                let summary = pipeline::enrich_countries(&db, &resolver).await?;
                println!(
                    "countries: {} authors enriched, {} lookups failed",
                    summary.records_enriched, summary.lookups_failed
                );
            }
        },
        Commands::Stats => {
            let papers = db.scan_papers()?.len();
            let authors = db.count_authors()?;
            println!("{papers} papers, {authors} authors");
        }
    }

    Ok(())
}
