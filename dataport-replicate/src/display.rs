//! Read-only replication preview.

use std::collections::BTreeMap;

use dataport_types::{DisplayPreview, Mode, diff_fields, project_package};

use crate::error::ReplicateResult;
use crate::mode::probe_target;
use crate::orchestrator::Replicator;

impl Replicator<'_> {
    /// Previews a replication of `package_id` without mutating either side.
    pub async fn display(&self, package_id: &str) -> ReplicateResult<DisplayPreview> {
        let existing = probe_target(self.target, package_id).await?;

        let raw = self.source.package_show(package_id).await?;
        let (package, resources) = project_package(&raw)?.split_resources();

        let (mode, changes) = match existing {
            Some(target_raw) => {
                let (current, _) = project_package(&target_raw)?.split_resources();
                (Mode::Update, diff_fields(&package, &current))
            }
            None => (Mode::Create, BTreeMap::new()),
        };

        Ok(DisplayPreview {
            mode,
            package,
            resources,
            changes,
        })
    }
}
