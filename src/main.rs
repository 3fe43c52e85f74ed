mod batch;
mod catalog;
mod config;
mod fetch;
mod locator;
mod offline;
mod parser;
mod record;
mod server;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use config::Settings;
use fetch::HttpFetcher;
use locator::Locator;
use parser::sections::SectionId;
use record::Assembler;

#[derive(Parser)]
#[command(name = "med_scraper", about = "Medicine page locator and section extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one medicine and print its record as JSON
    Lookup {
        /// Free-text medicine name, e.g. "Ibuprofen 200mg"
        name: String,
        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },
    /// Look up many medicines concurrently (one JSON record per line)
    Batch {
        names: Vec<String>,
        /// Max lookups in flight (default: MEDSCRAPE_CONCURRENCY or 4)
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
    /// Run the extractor on saved HTML pages, no network
    Extract {
        files: Vec<PathBuf>,
        /// Only extract this section (uses, warnings, dosage, side-effects, ...)
        #[arg(short, long)]
        section: Option<SectionId>,
        /// Source URL to record instead of the file path
        #[arg(long)]
        url: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        /// Bind address (default: MEDSCRAPE_BIND_ADDR or 0.0.0.0:3000)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn assembler(settings: &Settings) -> anyhow::Result<Assembler> {
    let fetcher = Arc::new(HttpFetcher::new(settings)?);
    Ok(Assembler::new(Locator::new(fetcher, settings)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries JSON, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Lookup { name, pretty } => {
            let record = assembler(&settings)?
                .assemble(&name)
                .await
                .with_context(|| format!("Lookup failed for \"{}\"", name))?;
            let json = if pretty {
                serde_json::to_string_pretty(&record)?
            } else {
                serde_json::to_string(&record)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Batch { names, concurrency } => {
            if names.is_empty() {
                println!("No names given.");
                return Ok(());
            }
            let assembler = Arc::new(assembler(&settings)?);
            let concurrency = concurrency.unwrap_or(settings.concurrency);
            eprintln!("Looking up {} medicines ({} at a time)...", names.len(), concurrency);
            let stats = batch::lookup_all(assembler, names, concurrency, |outcome| {
                match &outcome.result {
                    Ok(record) => println!("{}", serde_json::to_string(record)?),
                    Err(e) => eprintln!("{}: {}", outcome.name, e),
                }
                Ok(())
            })
            .await?;
            eprintln!(
                "Done: {} looked up ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::Extract {
            files,
            section,
            url,
        } => {
            if files.is_empty() {
                println!("No files given.");
                return Ok(());
            }
            let results = offline::extract_files(&files, section, url.as_deref())?;
            let mut failed = 0usize;
            for (path, out) in results {
                match out {
                    Ok(extraction) => println!("{}", serde_json::to_string(&extraction)?),
                    Err(e) => {
                        failed += 1;
                        warn!(path = %path.display(), error = %e, "Extraction failed");
                    }
                }
            }
            eprintln!("Extracted {} files ({} failed).", files.len(), failed);
            Ok(())
        }
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| settings.bind_addr.clone());
            let state = Arc::new(server::AppState {
                assembler: assembler(&settings)?,
            });
            server::serve(state, &addr).await
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
