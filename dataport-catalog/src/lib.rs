//! Catalog instance access for dataport.
//!
//! A catalog instance is reached through its action API
//! (`<address>/api/3/action/<name>`). [`CatalogApi`] is the seam the
//! replication engine talks to; [`RemoteCatalog`] implements it over HTTP.

mod api;
mod config;
mod error;
mod remote;

pub use api::{CatalogApi, Download, ResourceOp, ResourceUpload};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use remote::RemoteCatalog;
