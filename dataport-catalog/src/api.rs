//! Catalog collaborator interface.

use async_trait::async_trait;
use dataport_types::{DatastoreCreate, DatastorePage, PackageSummary, ResourceMeta};
use serde_json::Value;

use crate::error::CatalogResult;

/// Which action a file upload submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOp {
    /// New resource entry.
    Create,
    /// Existing resource entry, addressed by `ResourceMeta::id`.
    Patch,
}

impl ResourceOp {
    /// Action API name.
    pub fn action(&self) -> &'static str {
        match self {
            ResourceOp::Create => "resource_create",
            ResourceOp::Patch => "resource_patch",
        }
    }
}

/// A resource file to submit as a multipart form.
#[derive(Debug, Clone)]
pub struct ResourceUpload {
    pub meta: ResourceMeta,
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Raw bytes fetched from a resource URL.
#[derive(Debug, Clone, Default)]
pub struct Download {
    pub content: Vec<u8>,
    pub content_type: Option<String>,
}

/// Operations the replication engine needs from a catalog instance.
///
/// Calls are independent; nothing is cached between them.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Base address of the instance, without trailing slash.
    fn base_url(&self) -> &str;

    /// Whether the instance is classified as production.
    fn is_production(&self) -> bool;

    /// Owner organization configured for packages written to this instance.
    fn organization(&self) -> Option<&str> {
        None
    }

    /// Canonical browsing URL for a package on this instance.
    fn package_url(&self, name: &str) -> String {
        format!("{}/dataset/{}", self.base_url(), name)
    }

    /// Fetches a raw package record by id or name.
    async fn package_show(&self, id: &str) -> CatalogResult<Value>;

    /// Creates a package. The instance assigns the id.
    async fn package_create(&self, package: &Value) -> CatalogResult<PackageSummary>;

    /// Patches the package addressed by `package["id"]`.
    async fn package_patch(&self, package: &Value) -> CatalogResult<PackageSummary>;

    /// Irreversibly deletes a package and frees its name.
    async fn package_purge(&self, id: &str) -> CatalogResult<()>;

    /// Deletes one resource.
    async fn resource_delete(&self, id: &str) -> CatalogResult<()>;

    /// Fetches an organization record by id or name.
    async fn organization_show(&self, id: &str) -> CatalogResult<Value>;

    /// Reads up to `limit` rows of a resource's table, with the total row count.
    async fn datastore_search(&self, resource_id: &str, limit: u64) -> CatalogResult<DatastorePage>;

    /// Drops a resource's table.
    async fn datastore_delete(&self, resource_id: &str) -> CatalogResult<()>;

    /// Creates a table (and possibly its resource).
    async fn datastore_create(&self, payload: &DatastoreCreate) -> CatalogResult<()>;

    /// Submits resource metadata and file content as a multipart form.
    async fn upload_resource(&self, op: ResourceOp, upload: ResourceUpload) -> CatalogResult<Value>;

    /// Downloads a resource file from its public URL, unauthenticated.
    async fn fetch_file(&self, url: &str) -> CatalogResult<Download>;
}
