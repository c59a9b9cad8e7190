//! Errors raised by catalog collaborators.
//!
//! Data-quality gaps in rows are never errors: they are logged and skipped.
//! Only failures talking to the catalog end up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never produced a response (connection refused, timeout, TLS...).
    #[error("catalog transport error: {0}")]
    Transport(String),

    /// The catalog answered with a non-success status.
    #[error("catalog rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("failed to (de)serialize catalog payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The catalog answered successfully but the body did not have the expected shape.
    #[error("unexpected catalog response: {0}")]
    UnexpectedResponse(String),
}
