//! File resource replication.

use dataport_catalog::{CatalogApi, ResourceOp, ResourceUpload};
use dataport_types::ResourceMeta;
use serde_json::Value;
use tracing::info;

use crate::error::ReplicateResult;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Downloads `resource_url` and uploads it to the target.
///
/// With `target_resource_id` the existing target resource is patched,
/// otherwise a new one is created. Returns the target's resource record.
pub async fn replicate_file(
    source: &dyn CatalogApi,
    target: &dyn CatalogApi,
    resource_url: &str,
    target_resource_id: Option<&str>,
    mut meta: ResourceMeta,
) -> ReplicateResult<Value> {
    let download = source.fetch_file(resource_url).await?;

    let op = match target_resource_id {
        Some(id) => {
            meta.id = Some(id.to_string());
            ResourceOp::Patch
        }
        None => {
            meta.id = None;
            ResourceOp::Create
        }
    };

    let upload = ResourceUpload {
        file_name: meta.upload_file_name(),
        content_type: download
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        content: download.content,
        meta,
    };

    let name = upload.file_name.clone();
    let size = upload.content.len();
    let resource = target.upload_resource(op, upload).await?;

    info!("Uploaded {} ({} bytes) via {}", name, size, op.action());
    Ok(resource)
}
