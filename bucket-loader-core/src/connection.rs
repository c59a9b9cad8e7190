//! Connections and the cache that resolves them to qualified names.
//!
//! The cache is filled before any bucket rows are processed (by the CLI, from
//! config) and is only ever read afterwards.

use std::collections::HashMap;

use tracing::debug;

use crate::connector::ConnectorType;
use crate::row::{cell, Row};

pub const COL_CONNECTOR: &str = "CONNECTOR";
pub const COL_CONNECTION: &str = "CONNECTION";
pub const COL_ACCOUNT: &str = "ACCOUNT NAME";

/// Identifies a connection as written on a row: connector plus connection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    pub connector: ConnectorType,
    pub name: String,
}

impl ConnectionKey {
    pub fn new(connector: impl Into<ConnectorType>, name: impl Into<String>) -> Self {
        ConnectionKey {
            connector: connector.into(),
            name: name.into().trim().to_string(),
        }
    }

    /// Key for the connection referenced by a row, if both columns are filled.
    pub fn from_row(row: &Row) -> Option<Self> {
        let connector = cell(row, COL_CONNECTOR)?;
        let name = cell(row, COL_CONNECTION)?;
        Some(ConnectionKey::new(connector, name))
    }
}

/// Connection key to resolved connection qualified name.
pub type ConnectionCache = HashMap<ConnectionKey, String>;

/// Qualified name of the connection referenced by the row.
pub fn connection_qualified_name(cache: &ConnectionCache, row: &Row) -> Option<String> {
    let key = ConnectionKey::from_row(row)?;
    let resolved = cache.get(&key).cloned();
    if resolved.is_none() {
        debug!(connector = %key.connector, connection = %key.name, "Connection not found in cache");
    }
    resolved
}

/// Qualified name of the storage account referenced by the row (ADLS).
pub fn account_qualified_name(cache: &ConnectionCache, row: &Row) -> Option<String> {
    let connection_qualified_name = connection_qualified_name(cache, row)?;
    let account = cell(row, COL_ACCOUNT)?;
    Some(format!("{connection_qualified_name}/{account}"))
}
