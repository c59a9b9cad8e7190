//! Buffered submission of assets to the catalog.
//!
//! [`AssetBatch`] collects payloads and submits them through
//! [`CatalogClient::save_assets`] once `max_size` of them are waiting. Whatever is
//! left over must be pushed out with [`AssetBatch::flush`]; once `flush` returns,
//! every payload added so far exists in the catalog.

use tracing::{debug, info};

use crate::asset::AssetPayload;
use crate::contract::{CatalogClient, SaveResponse};
use crate::error::CatalogError;

pub struct AssetBatch<'c, C: CatalogClient + ?Sized> {
    client: &'c C,
    label: String,
    max_size: usize,
    pending: Vec<AssetPayload>,
    submitted: usize,
    created: Vec<String>,
    updated: Vec<String>,
}

impl<'c, C: CatalogClient + ?Sized> AssetBatch<'c, C> {
    /// `label` only appears in logs; a `max_size` of zero behaves like one.
    pub fn new(client: &'c C, label: impl Into<String>, max_size: usize) -> Self {
        let max_size = max_size.max(1);
        AssetBatch {
            client,
            label: label.into(),
            max_size,
            pending: Vec::with_capacity(max_size),
            submitted: 0,
            created: Vec::new(),
            updated: Vec::new(),
        }
    }

    /// Buffer a payload, submitting the buffer when it is full.
    ///
    /// Returns the catalog's response when this call triggered a submission.
    pub async fn add(&mut self, payload: AssetPayload) -> Result<Option<SaveResponse>, CatalogError> {
        debug!(
            batch = %self.label,
            type_name = payload.type_name(),
            qualified_name = payload.qualified_name(),
            "Queued asset"
        );
        self.pending.push(payload);
        if self.pending.len() >= self.max_size {
            self.submit().await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// Submit anything still buffered. No request is made when nothing is pending.
    pub async fn flush(&mut self) -> Result<Option<SaveResponse>, CatalogError> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        self.submit().await.map(Some)
    }

    async fn submit(&mut self) -> Result<SaveResponse, CatalogError> {
        let assets = std::mem::replace(&mut self.pending, Vec::with_capacity(self.max_size));
        let count = assets.len();
        info!(batch = %self.label, count, "Submitting asset batch");
        let response = self.client.save_assets(assets).await?;
        info!(
            batch = %self.label,
            created = response.created.len(),
            updated = response.updated.len(),
            "Asset batch saved"
        );
        self.submitted += count;
        self.created.extend(response.created.iter().cloned());
        self.updated.extend(response.updated.iter().cloned());
        Ok(response)
    }

    /// Number of payloads handed to the catalog so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn created(&self) -> &[String] {
        &self.created
    }

    pub fn updated(&self) -> &[String] {
        &self.updated
    }
}
