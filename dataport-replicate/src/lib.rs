//! Package replication between two catalog instances.
//!
//! # Components
//!
//! - **Mode**: probes the target to choose between `create` and `update`
//! - **Tabular**: copies a resource's table (schema and rows) wholesale
//! - **File**: downloads a resource file and re-uploads it to the target
//! - **Purge**: removes a package and its resources from an instance
//! - **Orchestrator**: drives one package end to end and cleans up on failure
//! - **Display**: read-only preview of what a replication would do
//!
//! Resources are matched across instances by name, never by id. Every call
//! is awaited in order; nothing inside a replication runs concurrently.
//!
//! # Example
//!
//! ```no_run
//! use dataport_catalog::{CatalogConfig, RemoteCatalog};
//! use dataport_replicate::Replicator;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = RemoteCatalog::new(CatalogConfig::new("https://staging.example.org", None))?;
//! let target = RemoteCatalog::new(CatalogConfig::new(
//!     "https://open.example.org",
//!     Some("api-token".to_string()),
//! ))?;
//!
//! let replicator = Replicator::new(&source, &target);
//! let mode = replicator.resolve_mode("ds1").await?;
//! let outcome = replicator.replicate("ds1", mode, false).await?;
//! println!("{}", outcome.url);
//! # Ok(())
//! # }
//! ```

mod display;
mod error;
pub mod file;
pub mod mode;
mod orchestrator;
pub mod purge;
pub mod tabular;

pub use error::{ReplicateError, ReplicateResult};
pub use file::replicate_file;
pub use mode::{probe_target, resolve_mode};
pub use orchestrator::Replicator;
pub use purge::purge_package;
pub use tabular::replicate_tabular;
