//! Tabular (datastore) resource replication.

use dataport_catalog::CatalogApi;
use dataport_types::{DatastoreCreate, ResourceMeta, TabularData};
use tracing::{debug, info, warn};

use crate::error::ReplicateResult;

/// Copies the table of source resource `resource_id` to the target.
///
/// With `target_resource_id`, the existing target table is dropped and
/// recreated in place. Without it, the table is created together with a new
/// resource built from `meta`.
pub async fn replicate_tabular(
    source: &dyn CatalogApi,
    target: &dyn CatalogApi,
    resource_id: &str,
    target_resource_id: Option<&str>,
    meta: ResourceMeta,
) -> ReplicateResult<()> {
    let probe = source.datastore_search(resource_id, 0).await?;
    let total = match probe.total {
        Some(total) => total,
        None => {
            if !probe.fields.is_empty() {
                warn!(
                    "Source reported no row count for {}; copying schema only",
                    resource_id
                );
            }
            0
        }
    };

    let page = if total == 0 {
        probe
    } else {
        source.datastore_search(resource_id, total).await?
    };

    if (page.records.len() as u64) < total {
        warn!(
            "Source returned {} of {} rows for {}",
            page.records.len(),
            total,
            resource_id
        );
    }

    let data = TabularData::from_page(page);
    let rows = data.len();

    let payload = match target_resource_id {
        Some(existing) => {
            match target.datastore_delete(existing).await {
                Ok(()) => {}
                // The resource exists but never had a table.
                Err(e) if e.is_not_found() => debug!("No table to drop for {}", existing),
                Err(e) => return Err(e.into()),
            }
            DatastoreCreate::for_existing(existing, data)
        }
        None => DatastoreCreate::with_new_resource(meta, data),
    };

    target.datastore_create(&payload).await?;
    info!("Replicated table {} ({} rows)", resource_id, rows);
    Ok(())
}
