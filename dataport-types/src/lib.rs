//! Core data model for dataport.
//!
//! This crate defines the catalog-agnostic records exchanged between the
//! source and target catalog instances:
//! - Projected packages and resources (the whitelisted migration subset)
//! - Tabular (datastore) payloads with the row-identity column stripped
//! - Replication modes, display previews and replication outcomes
//!
//! Projection from raw catalog records lives in [`projection`]; it is pure
//! and never mutates its input.

mod package;
mod plan;
pub mod projection;
mod tabular;

pub use package::{PackageSummary, ProjectedPackage, ProjectedResource, ResourceMeta, ResourceSummary};
pub use plan::{DisplayPreview, FieldChange, Mode, ReplicationOutcome};
pub use projection::{diff_fields, flatten_tags, project_package, project_resource};
pub use tabular::{DatastoreCreate, DatastorePage, FieldSpec, Record, TabularData, ROW_IDENTITY_FIELD};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while interpreting catalog records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{entity} record is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity} record is not a JSON object")]
    NotAnObject { entity: &'static str },

    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
