//! The `load` pipeline: rows → buckets → catalog.
//!
//! Kept free of CLI parsing and of any concrete catalog client so that it can be
//! driven from tests with a mocked [`CatalogClient`].

use anyhow::{Context, Result};
use bucket_loader_core::bucket::{upsert, UpsertReport};
use bucket_loader_core::contract::CatalogClient;
use bucket_loader_core::row::Row;
use tracing::info;

use crate::load_config::CliConfig;
use crate::rows::collect_buckets;

/// Settings for one run, after CLI flags have been applied over the config file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub delimiter: String,
}

impl LoadOptions {
    pub fn from_config(config: &CliConfig) -> Self {
        LoadOptions {
            batch_size: config.load.batch_size,
            delimiter: config.load.delimiter.clone(),
        }
    }
}

pub async fn load<C>(
    client: &C,
    config: &CliConfig,
    rows: &[Row],
    options: &LoadOptions,
) -> Result<UpsertReport>
where
    C: CatalogClient + ?Sized,
{
    let cache = config.connection_cache();
    info!(
        rows = rows.len(),
        connections = cache.len(),
        batch_size = options.batch_size,
        "Starting bucket load"
    );
    let buckets = collect_buckets(&cache, rows, &options.delimiter);
    let report = upsert(client, &buckets, options.batch_size)
        .await
        .context("Failed to upsert buckets")?;
    info!(?report, "Bucket load complete");
    Ok(report)
}
