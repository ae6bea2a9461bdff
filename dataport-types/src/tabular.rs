//! Tabular (datastore) payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ResourceMeta;

/// Row-identity column the tabular store adds to every table.
pub const ROW_IDENTITY_FIELD: &str = "_id";

/// A single row: field name to value.
pub type Record = Map<String, Value>;

/// Column descriptor in a tabular store schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Data dictionary entry (label, notes), carried verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

/// One `datastore_search` response page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatastorePage {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Schema and rows of one table, without the row-identity column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularData {
    pub fields: Vec<FieldSpec>,
    pub records: Vec<Record>,
}

impl TabularData {
    /// Builds a payload from a source page, dropping the row-identity field
    /// from both the schema and every row.
    pub fn from_page(page: DatastorePage) -> Self {
        let fields = page
            .fields
            .into_iter()
            .filter(|f| f.id != ROW_IDENTITY_FIELD)
            .collect();

        let records = page
            .records
            .into_iter()
            .map(|mut row| {
                row.remove(ROW_IDENTITY_FIELD);
                row
            })
            .collect();

        Self { fields, records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Body of a `datastore_create` call.
///
/// Exactly one of `resource_id` (replace the table of an existing resource)
/// or `resource` (create a new resource along with the table) is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatastoreCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceMeta>,
    pub fields: Vec<FieldSpec>,
    pub records: Vec<Record>,
    #[serde(default)]
    pub force: bool,
}

impl DatastoreCreate {
    /// Table for an existing target resource.
    pub fn for_existing(resource_id: impl Into<String>, data: TabularData) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            resource: None,
            fields: data.fields,
            records: data.records,
            force: true,
        }
    }

    /// Table plus a new resource created from `meta`.
    pub fn with_new_resource(meta: ResourceMeta, data: TabularData) -> Self {
        Self {
            resource_id: None,
            resource: Some(meta),
            fields: data.fields,
            records: data.records,
            force: true,
        }
    }
}
