//! Errors that stop an import before any record is processed.
//!
//! Per-record directory failures are not errors at this level; they are
//! collected in the [`ImportReport`](crate::ImportReport).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The export payload could not be decoded.
    #[error("invalid import payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ImportError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
