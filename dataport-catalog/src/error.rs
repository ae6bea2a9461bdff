//! Error types for catalog access.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur talking to a catalog instance.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested entity does not exist on the instance.
    #[error("not found: {0}")]
    NotFound(String),

    /// The catalog answered but rejected or failed the action.
    #[error("{action} failed ({status}): {message}")]
    Upstream {
        action: String,
        status: u16,
        message: String,
    },

    /// The request never completed (connection, download or upload failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CatalogError {
    /// Returns true if this error means the entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}
