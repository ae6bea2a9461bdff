//! Package purging.

use dataport_catalog::CatalogApi;
use dataport_types::PackageSummary;
use tracing::{debug, info};

use crate::error::ReplicateResult;

/// Deletes every resource of a package, then purges the package.
///
/// Resources are removed one by one first; package-level deletion leaves
/// their tables behind. Returns `false` if the package did not exist.
pub async fn purge_package(catalog: &dyn CatalogApi, package_id: &str) -> ReplicateResult<bool> {
    let raw = match catalog.package_show(package_id).await {
        Ok(raw) => raw,
        Err(e) if e.is_not_found() => {
            debug!("Nothing to purge for {} on {}", package_id, catalog.base_url());
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };
    let package: PackageSummary = serde_json::from_value(raw)?;

    for resource in &package.resources {
        match catalog.resource_delete(&resource.id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
    }

    catalog.package_purge(&package.id).await?;
    info!(
        "Purged {} ({} resources) from {}",
        package.name,
        package.resources.len(),
        catalog.base_url()
    );
    Ok(true)
}
