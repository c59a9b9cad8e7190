//! # contract: interface to the data catalog
//!
//! This module defines the single trait ([`CatalogClient`]) through which the loader
//! talks to an external catalog, plus the plain data returned by it.
//!
//! ## Interface & Extensibility
//! - Implement [`CatalogClient`] to target a new catalog backend (REST, in-memory, etc).
//! - All methods are async and return [`CatalogError`] on failure.
//! - Implementations must treat `save_assets` as create-or-update keyed on
//!   `(typeName, qualifiedName)`.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate deterministic mocks
//!   (`MockCatalogClient`) for unit and integration tests.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::asset::AssetPayload;
use crate::error::CatalogError;

/// Result of submitting one batch of assets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveResponse {
    /// Qualified names of assets the catalog created.
    pub created: Vec<String>,
    /// Qualified names of assets that already existed and were updated.
    pub updated: Vec<String>,
}

/// Trait for creating assets and tagging them in a catalog.
/// The implementor is responsible for transport, authentication and retries.
///
/// The trait is implemented by real clients and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Create or update all given assets in one request.
    async fn save_assets(&self, assets: Vec<AssetPayload>) -> Result<SaveResponse, CatalogError>;

    /// Names of the classifications currently attached to an existing asset.
    ///
    /// Returns an empty list for an asset without classifications.
    async fn get_classifications(
        &self,
        type_name: &str,
        qualified_name: &str,
    ) -> Result<Vec<String>, CatalogError>;

    /// Attach classifications to an asset that already exists in the catalog.
    async fn append_classifications(
        &self,
        type_name: &str,
        qualified_name: &str,
        classifications: Vec<String>,
    ) -> Result<(), CatalogError>;
}
