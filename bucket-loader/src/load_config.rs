//! `load_config` module: Loads a static YAML config into the loader's typed configuration.
//!
//! This module is the only place where user-supplied YAML is parsed and mapped to
//! strongly-typed structs.
//!
//! # Responsibilities
//! - Parse the YAML configuration file into [`CliConfig`]
//! - Fill in defaults for omitted sections (batch size, delimiter, timeouts)
//! - Build the connection cache used to resolve rows to connections
//!
//! Secrets (the catalog API token) are never read from this file; see
//! [`crate::catalog::RestCatalogClient::from_config`].
//!
//! # Errors
//! All errors in this module use `anyhow::Error` for context-rich diagnostics, and are surfaced at the CLI boundary.

use anyhow::{Context, Result};
use bucket_loader_core::connection::{ConnectionCache, ConnectionKey};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub load: LoadSection,
    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSection {
    /// Falls back to `CATALOG_BASE_URL` when omitted.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogSection {
    fn default() -> Self {
        CatalogSection {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoadSection {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Separator between values in multi-valued cells.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for LoadSection {
    fn default() -> Self {
        LoadSection {
            batch_size: default_batch_size(),
            delimiter: default_delimiter(),
        }
    }
}

/// A connection already present in the catalog, as rows refer to it.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionEntry {
    pub connector: String,
    pub connection: String,
    pub qualified_name: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    20
}

fn default_delimiter() -> String {
    "\n".to_string()
}

impl CliConfig {
    /// Connection cache for resolving the `CONNECTOR` / `CONNECTION` columns of rows.
    pub fn connection_cache(&self) -> ConnectionCache {
        let mut cache = ConnectionCache::new();
        for entry in &self.connections {
            let key = ConnectionKey::new(entry.connector.as_str(), entry.connection.as_str());
            if let Some(previous) = cache.insert(key, entry.qualified_name.clone()) {
                warn!(
                    connector = %entry.connector,
                    connection = %entry.connection,
                    previous = %previous,
                    replacement = %entry.qualified_name,
                    "Connection declared twice; keeping the last declaration"
                );
            }
        }
        cache
    }
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = serde_yaml::from_str(&config_content)
        .map_err(|e| {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            e
        })
        .context("Failed to parse config YAML")?;

    if config.load.batch_size == 0 {
        error!(config_path = ?path_ref, "load.batch_size must be positive");
        anyhow::bail!("load.batch_size must be positive");
    }

    info!(
        config_path = ?path_ref,
        connections = config.connections.len(),
        batch_size = config.load.batch_size,
        "Config loaded successfully"
    );
    Ok(config)
}
