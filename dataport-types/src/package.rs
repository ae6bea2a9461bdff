//! Package and resource records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The migration subset of a catalog package.
///
/// Only whitelisted fields exist here; a field that was absent (or null) in
/// the source record stays `None` and is never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPackage {
    /// Catalog-unique name, the stable key across instances.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ProjectedResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_url: Option<String>,
    /// Boolean on scheming catalogs, `"true"`/`"false"` on older ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_retired: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<String>,
    /// Tag names joined with commas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl ProjectedPackage {
    /// Splits the package into its metadata and its resource list.
    pub fn split_resources(mut self) -> (ProjectedPackage, Vec<ProjectedResource>) {
        let resources = std::mem::take(&mut self.resources);
        (self, resources)
    }
}

/// The migration subset of a catalog resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedResource {
    /// Source-instance id. Not portable to the target.
    pub id: String,
    /// Matching key within a package.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datastore_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_job: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ProjectedResource {
    /// Whether the resource content lives in the tabular store.
    pub fn is_tabular(&self) -> bool {
        self.datastore_active.unwrap_or(false)
    }

    /// File name used for uploads: `<name>.<format>` with the format
    /// lowercased (`CSV` gives `data.csv`), or the bare name when the format
    /// is unknown. The extension is appended even if the name already has one.
    pub fn upload_file_name(&self) -> String {
        file_name(&self.name, self.format.as_deref())
    }

    /// Builds the metadata sent to the target for this resource.
    ///
    /// The source id and URL are dropped; `id` is only filled in by callers
    /// that alias an existing target resource.
    pub fn to_meta(&self, package_id: &str) -> ResourceMeta {
        ResourceMeta {
            id: None,
            package_id: package_id.to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            format: self.format.clone(),
            extract_job: self.extract_job.clone(),
            datastore_active: self.datastore_active,
        }
    }
}

/// Resource metadata as submitted to the target catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeta {
    /// Target-local id, set only when updating an existing target resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub package_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_job: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datastore_active: Option<bool>,
}

impl ResourceMeta {
    /// File name used for uploads, see [`ProjectedResource::upload_file_name`].
    pub fn upload_file_name(&self) -> String {
        file_name(&self.name, self.format.as_deref())
    }
}

fn file_name(name: &str, format: Option<&str>) -> String {
    match format.map(str::trim) {
        Some(format) if !format.is_empty() => format!("{}.{}", name, format.to_lowercase()),
        _ => name.to_string(),
    }
}

/// Minimal view of a package as returned by create/patch/show on the target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceSummary>,
}

impl PackageSummary {
    /// Returns the first resource whose name matches.
    pub fn find_resource(&self, name: &str) -> Option<&ResourceSummary> {
        self.resources
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }
}

/// Minimal view of a target resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}
