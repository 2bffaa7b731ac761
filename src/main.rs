//! shopsnap CLI
//!
//! Single entry point: load settings, run the sync, report the outcome.

use clap::Parser;
use shopsnap::{Result, SyncEngine, SyncOutcome, SyncSettings};
use std::path::PathBuf;

/// One-shot Shopify catalog snapshot sync into a warehouse table
#[derive(Parser)]
#[command(name = "shopsnap", version, about)]
struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let settings = match &cli.env_file {
        Some(path) => SyncSettings::from_env_file(path)?,
        None => SyncSettings::from_env()?,
    };

    let engine = SyncEngine::new(settings);
    match engine.run().await? {
        SyncOutcome::Completed(report) => {
            println!(
                "Wrote {} rows in {:.1}s",
                report.rows_written,
                report.elapsed_seconds()
            );
        }
        SyncOutcome::NoData { .. } => {
            println!("No products found; nothing to load");
        }
    }

    Ok(())
}
