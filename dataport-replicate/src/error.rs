//! Error types for replication.

use dataport_catalog::CatalogError;
use thiserror::Error;

/// Result type for replication operations.
pub type ReplicateResult<T> = Result<T, ReplicateError>;

/// Errors that can occur while replicating a package.
#[derive(Debug, Error)]
pub enum ReplicateError {
    /// A catalog call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A source record could not be projected.
    #[error("invalid catalog record: {0}")]
    Projection(#[from] dataport_types::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A file resource has no URL to download from.
    #[error("resource {resource} has no url")]
    MissingUrl { resource: String },
}

impl ReplicateError {
    /// Returns true if this error means an entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReplicateError::Catalog(e) if e.is_not_found())
    }
}
