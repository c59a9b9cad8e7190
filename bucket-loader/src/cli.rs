//! This module implements the CLI interface for bucket-loader: command parsing,
//! argument overrides and the `run` entrypoint.
//!
//! All bucket logic (row resolution, payloads, batching, classification) lives in the
//! [`bucket-loader-core`] crate. This module is strictly CLI glue.
//!
//! ## How To Use
//! - For command-line users: use the installed `bucket-loader` binary with `--help`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
//!
//! [`bucket-loader-core`]: ../../bucket-loader-core/

use crate::catalog::RestCatalogClient;
use crate::load::{load, LoadOptions};
use crate::load_config::load_config;
use crate::rows::load_rows;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for bucket-loader: load object-store buckets from a spreadsheet into a catalog.
#[derive(Parser)]
#[clap(
    name = "bucket-loader",
    version,
    about = "Create or update S3, GCS and ADLS buckets in a data catalog from spreadsheet rows"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upsert every bucket described in the rows file, then attach its classifications
    Load {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Path to the CSV export of the spreadsheet
        #[clap(long)]
        rows: PathBuf,
        /// Maximum number of assets per catalog request (overrides load.batch_size)
        #[clap(long)]
        batch_size: Option<usize>,
        /// Separator between values in multi-valued cells (overrides load.delimiter)
        #[clap(long)]
        delimiter: Option<String>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Load {
            config,
            rows,
            batch_size,
            delimiter,
        } => {
            let config = load_config(config)?;
            let mut options = LoadOptions::from_config(&config);
            if let Some(batch_size) = batch_size {
                anyhow::ensure!(batch_size > 0, "--batch-size must be positive");
                options.batch_size = batch_size;
            }
            if let Some(delimiter) = delimiter {
                options.delimiter = delimiter;
            }

            let rows = load_rows(&rows)?;
            let client = RestCatalogClient::from_config(&config.catalog)
                .map_err(|e| anyhow::anyhow!(e))
                .context("Failed to construct catalog client")?;

            tracing::info!(command = "load", "Starting bucket load");
            let report = load(&client, &config, &rows, &options).await?;
            println!(
                "Load complete: {} submitted ({} created, {} updated), {} skipped, {} classified",
                report.submitted,
                report.created.len(),
                report.updated.len(),
                report.skipped,
                report.classified
            );
            Ok(())
        }
    }
}
