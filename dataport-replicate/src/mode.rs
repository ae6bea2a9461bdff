//! Create-vs-update resolution.

use dataport_catalog::CatalogApi;
use dataport_types::Mode;
use serde_json::Value;
use tracing::debug;

use crate::error::ReplicateResult;

/// Fetches the target package if it exists.
///
/// Not-found is `Ok(None)`; every other failure is returned unchanged.
pub async fn probe_target(target: &dyn CatalogApi, package_id: &str) -> ReplicateResult<Option<Value>> {
    match target.package_show(package_id).await {
        Ok(package) => Ok(Some(package)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolves `update` if the target already has the package, else `create`.
pub async fn resolve_mode(target: &dyn CatalogApi, package_id: &str) -> ReplicateResult<Mode> {
    let mode = match probe_target(target, package_id).await? {
        Some(_) => Mode::Update,
        None => Mode::Create,
    };
    debug!("Resolved {} for {}", mode, package_id);
    Ok(mode)
}
