//! End-to-end replication of one package.

use dataport_catalog::CatalogApi;
use dataport_types::{
    Mode, PackageSummary, ProjectedPackage, ProjectedResource, ReplicationOutcome, project_package,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::{ReplicateError, ReplicateResult};
use crate::file::replicate_file;
use crate::mode::resolve_mode;
use crate::purge::purge_package;
use crate::tabular::replicate_tabular;

/// Package body sent to `package_create` / `package_patch`.
#[derive(Serialize)]
struct PackagePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private: Option<bool>,
    #[serde(flatten)]
    package: &'a ProjectedPackage,
}

/// Replicates packages from a source catalog to a target catalog.
pub struct Replicator<'a> {
    pub(crate) source: &'a dyn CatalogApi,
    pub(crate) target: &'a dyn CatalogApi,
}

impl<'a> Replicator<'a> {
    pub fn new(source: &'a dyn CatalogApi, target: &'a dyn CatalogApi) -> Self {
        Self { source, target }
    }

    /// Resolves the mode for `package_id` against the target.
    pub async fn resolve_mode(&self, package_id: &str) -> ReplicateResult<Mode> {
        resolve_mode(self.target, package_id).await
    }

    /// Replicates `package_id` and all its resources to the target.
    ///
    /// Once this invocation has created or started patching the target
    /// package, any failure purges it before the error is returned. A create
    /// that the target rejects leaves the target alone. With `clean_source`, a
    /// non-production source package is purged after success; a failure
    /// there is reported in the outcome and does not fail the replication.
    pub async fn replicate(
        &self,
        package_id: &str,
        mode: Mode,
        clean_source: bool,
    ) -> ReplicateResult<ReplicationOutcome> {
        info!("Replicating {} to {} ({})", package_id, self.target.base_url(), mode);

        let mut touched: Option<String> = None;
        let result = self.run(package_id, mode, &mut touched).await;
        let name = match result {
            Ok(name) => name,
            Err(e) => {
                warn!("Replication of {} failed: {}", package_id, e);
                if let Some(target_id) = touched {
                    if let Err(purge_err) = purge_package(self.target, &target_id).await {
                        warn!("Purge of {} on target failed: {}", target_id, purge_err);
                    }
                }
                return Err(e);
            }
        };

        let mut outcome = ReplicationOutcome {
            url: self.target.package_url(&name),
            mode,
            source_purged: false,
            source_cleanup_error: None,
        };

        if clean_source {
            self.clean_source(package_id, &mut outcome).await;
        }

        info!("Replicated {} to {}", package_id, outcome.url);
        Ok(outcome)
    }

    async fn run(
        &self,
        package_id: &str,
        mode: Mode,
        touched: &mut Option<String>,
    ) -> ReplicateResult<String> {
        let raw = self.source.package_show(package_id).await?;
        let (package, resources) = project_package(&raw)?.split_resources();
        let owner_org = self.resolve_owner_org(&raw).await?;

        let target_package = match mode {
            Mode::Create => {
                let payload = PackagePayload {
                    id: None,
                    owner_org,
                    private: Some(true),
                    package: &package,
                };
                let created = self
                    .target
                    .package_create(&serde_json::to_value(&payload)?)
                    .await?;
                *touched = Some(created.id.clone());
                created
            }
            Mode::Update => {
                let payload = PackagePayload {
                    id: Some(package.name.as_str()),
                    owner_org,
                    private: None,
                    package: &package,
                };
                *touched = Some(package.name.clone());
                self.target
                    .package_patch(&serde_json::to_value(&payload)?)
                    .await?
            }
        };

        for resource in &resources {
            self.replicate_resource(&target_package, resource).await?;
        }

        if mode == Mode::Create {
            self.target
                .package_patch(&json!({ "id": target_package.id, "private": false }))
                .await?;
        }

        Ok(package.name)
    }

    async fn replicate_resource(
        &self,
        target_package: &PackageSummary,
        resource: &ProjectedResource,
    ) -> ReplicateResult<()> {
        let matched = target_package
            .find_resource(&resource.name)
            .map(|r| r.id.as_str());
        let meta = resource.to_meta(&target_package.id);

        info!(
            "Resource {} -> {} ({}, {})",
            resource.name,
            target_package.name,
            if resource.is_tabular() { "table" } else { "file" },
            if matched.is_some() { "replace" } else { "new" },
        );

        if resource.is_tabular() {
            replicate_tabular(self.source, self.target, &resource.id, matched, meta).await
        } else {
            let url = resource
                .url
                .as_deref()
                .ok_or_else(|| ReplicateError::MissingUrl {
                    resource: resource.name.clone(),
                })?;
            replicate_file(self.source, self.target, url, matched, meta).await?;
            Ok(())
        }
    }

    /// Looks up the target organization id for the package.
    ///
    /// A configured target organization must exist. Otherwise the source
    /// package's organization is used when the target has one by that name.
    async fn resolve_owner_org(&self, raw: &Value) -> ReplicateResult<Option<String>> {
        if let Some(configured) = self.target.organization() {
            let org = self.target.organization_show(configured).await?;
            return Ok(org.get("id").and_then(Value::as_str).map(str::to_string));
        }

        let Some(name) = raw
            .get("organization")
            .and_then(|o| o.get("name"))
            .and_then(Value::as_str)
        else {
            return Ok(None);
        };

        match self.target.organization_show(name).await {
            Ok(org) => Ok(org.get("id").and_then(Value::as_str).map(str::to_string)),
            Err(e) if e.is_not_found() => {
                warn!("Organization {} does not exist on target", name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn clean_source(&self, package_id: &str, outcome: &mut ReplicationOutcome) {
        if self.source.is_production() {
            warn!("Source is production; not purging {}", package_id);
            outcome.source_cleanup_error =
                Some("source catalog is production; cleanup skipped".to_string());
            return;
        }

        match purge_package(self.source, package_id).await {
            Ok(purged) => outcome.source_purged = purged,
            Err(e) => {
                warn!("Source cleanup of {} failed: {}", package_id, e);
                outcome.source_cleanup_error = Some(e.to_string());
            }
        }
    }
}
