//! In-memory catalog used by the replication tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use dataport_catalog::{CatalogApi, CatalogError, CatalogResult, Download, ResourceOp, ResourceUpload};
use dataport_types::{DatastoreCreate, DatastorePage, FieldSpec, PackageSummary, Record};
use serde_json::{Map, Value, json};

#[derive(Default)]
struct State {
    packages: BTreeMap<String, Value>,
    tables: HashMap<String, DatastorePage>,
    files: HashMap<String, (Vec<u8>, Option<String>)>,
    organizations: HashMap<String, Value>,
    calls: Vec<String>,
    fail_on: Option<String>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn package_key(&self, id: &str) -> Option<String> {
        self.packages
            .iter()
            .find(|(name, pkg)| name.as_str() == id || pkg["id"] == json!(id))
            .map(|(name, _)| name.clone())
    }

    fn resource_mut(&mut self, id: &str) -> Option<&mut Map<String, Value>> {
        self.packages.values_mut().find_map(|pkg| {
            pkg["resources"]
                .as_array_mut()?
                .iter_mut()
                .filter_map(Value::as_object_mut)
                .find(|r| r.get("id") == Some(&json!(id)))
        })
    }
}

/// A catalog instance held entirely in memory.
pub struct MemoryCatalog {
    base: String,
    production: bool,
    organization: Option<String>,
    report_totals: bool,
    state: Mutex<State>,
}

impl MemoryCatalog {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            production: false,
            organization: None,
            report_totals: true,
            state: Mutex::new(State::default()),
        }
    }

    pub fn production(mut self) -> Self {
        self.production = true;
        self
    }

    /// Table searches leave out the total row count.
    pub fn without_totals(mut self) -> Self {
        self.report_totals = false;
        self
    }

    pub fn with_organization(mut self, name: &str) -> Self {
        self.organization = Some(name.to_string());
        self
    }

    /// Stores a raw package record as-is. Returns its id.
    pub fn insert_package(&self, package: Value) -> String {
        let mut state = self.state.lock().unwrap();
        let name = package["name"].as_str().unwrap().to_string();
        let id = package["id"].as_str().unwrap().to_string();
        state.packages.insert(name, package);
        id
    }

    /// Stores a table for `resource_id`, adding the row-identity column.
    pub fn insert_table(&self, resource_id: &str, fields: &[(&str, &str)], rows: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        let page = with_row_identity(
            fields
                .iter()
                .map(|(id, ty)| FieldSpec {
                    id: id.to_string(),
                    field_type: Some(ty.to_string()),
                    info: None,
                })
                .collect(),
            rows.into_iter()
                .map(|r| r.as_object().unwrap().clone())
                .collect(),
        );
        state.tables.insert(resource_id.to_string(), page);
    }

    pub fn insert_file(&self, url: &str, content: &[u8], content_type: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        state
            .files
            .insert(url.to_string(), (content.to_vec(), content_type.map(str::to_string)));
    }

    pub fn insert_organization(&self, name: &str, id: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .organizations
            .insert(name.to_string(), json!({ "id": id, "name": name }));
    }

    /// Makes every call to `action` fail with an upstream error.
    pub fn fail_on(&self, action: &str) {
        self.state.lock().unwrap().fail_on = Some(action.to_string());
    }

    pub fn package(&self, name: &str) -> Option<Value> {
        self.state.lock().unwrap().packages.get(name).cloned()
    }

    pub fn table(&self, resource_id: &str) -> Option<DatastorePage> {
        self.state.lock().unwrap().tables.get(resource_id).cloned()
    }

    pub fn file(&self, url: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(url)
            .map(|(content, _)| content.clone())
    }

    pub fn file_content_type(&self, url: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(url)
            .and_then(|(_, content_type)| content_type.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn called(&self, action: &str) -> bool {
        self.calls().iter().any(|c| c == action)
    }

    fn record(&self, state: &mut State, action: &str) -> CatalogResult<()> {
        state.calls.push(action.to_string());
        if state.fail_on.as_deref() == Some(action) {
            return Err(CatalogError::Upstream {
                action: action.to_string(),
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn summary(package: &Value) -> CatalogResult<PackageSummary> {
        Ok(serde_json::from_value(package.clone())?)
    }
}

fn with_row_identity(mut fields: Vec<FieldSpec>, records: Vec<Record>) -> DatastorePage {
    fields.insert(
        0,
        FieldSpec {
            id: "_id".to_string(),
            field_type: Some("int".to_string()),
            info: None,
        },
    );
    let records: Vec<Record> = records
        .into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            row.insert("_id".to_string(), json!(i + 1));
            row
        })
        .collect();
    DatastorePage {
        total: Some(records.len() as u64),
        fields,
        records,
    }
}

fn not_found(what: &str) -> CatalogError {
    CatalogError::NotFound(what.to_string())
}

#[async_trait]
impl CatalogApi for MemoryCatalog {
    fn base_url(&self) -> &str {
        &self.base
    }

    fn is_production(&self) -> bool {
        self.production
    }

    fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    async fn package_show(&self, id: &str) -> CatalogResult<Value> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "package_show")?;
        let key = state.package_key(id).ok_or_else(|| not_found(id))?;
        Ok(state.packages[&key].clone())
    }

    async fn package_create(&self, package: &Value) -> CatalogResult<PackageSummary> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "package_create")?;
        let name = package["name"].as_str().unwrap_or_default().to_string();
        if state.packages.contains_key(&name) {
            return Err(CatalogError::Upstream {
                action: "package_create".to_string(),
                status: 409,
                message: "That URL is already in use.".to_string(),
            });
        }
        let mut stored = package.clone();
        stored["id"] = json!(state.next_id("pkg"));
        stored["resources"] = json!([]);
        let summary = Self::summary(&stored)?;
        state.packages.insert(name, stored);
        Ok(summary)
    }

    async fn package_patch(&self, package: &Value) -> CatalogResult<PackageSummary> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "package_patch")?;
        let id = package["id"].as_str().unwrap_or_default();
        let key = state.package_key(id).ok_or_else(|| not_found(id))?;
        let stored = state.packages.get_mut(&key).unwrap();
        for (field, value) in package.as_object().unwrap() {
            if field != "id" && field != "resources" {
                stored[field] = value.clone();
            }
        }
        Self::summary(stored)
    }

    async fn package_purge(&self, id: &str) -> CatalogResult<()> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "dataset_purge")?;
        let key = state.package_key(id).ok_or_else(|| not_found(id))?;
        state.packages.remove(&key);
        Ok(())
    }

    async fn resource_delete(&self, id: &str) -> CatalogResult<()> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "resource_delete")?;
        let mut found = false;
        for pkg in state.packages.values_mut() {
            if let Some(resources) = pkg["resources"].as_array_mut() {
                let before = resources.len();
                resources.retain(|r| r["id"] != json!(id));
                found |= resources.len() != before;
            }
        }
        if !found {
            return Err(not_found(id));
        }
        state.tables.remove(id);
        Ok(())
    }

    async fn organization_show(&self, id: &str) -> CatalogResult<Value> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "organization_show")?;
        state
            .organizations
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn datastore_search(&self, resource_id: &str, limit: u64) -> CatalogResult<DatastorePage> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "datastore_search")?;
        let table = state
            .tables
            .get(resource_id)
            .ok_or_else(|| not_found(resource_id))?;
        Ok(DatastorePage {
            fields: table.fields.clone(),
            records: table.records.iter().take(limit as usize).cloned().collect(),
            total: self.report_totals.then(|| table.records.len() as u64),
        })
    }

    async fn datastore_delete(&self, resource_id: &str) -> CatalogResult<()> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "datastore_delete")?;
        state
            .tables
            .remove(resource_id)
            .map(|_| ())
            .ok_or_else(|| not_found(resource_id))
    }

    async fn datastore_create(&self, payload: &DatastoreCreate) -> CatalogResult<()> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "datastore_create")?;

        let resource_id = match (&payload.resource_id, &payload.resource) {
            (Some(id), _) => {
                if state.resource_mut(id).is_none() {
                    return Err(not_found(id));
                }
                id.clone()
            }
            (None, Some(meta)) => {
                let id = state.next_id("res");
                let key = state
                    .package_key(&meta.package_id)
                    .ok_or_else(|| not_found(&meta.package_id))?;
                let mut resource = serde_json::to_value(meta)?;
                resource["id"] = json!(id);
                resource["datastore_active"] = json!(true);
                let pkg = state.packages.get_mut(&key).unwrap();
                pkg["resources"].as_array_mut().unwrap().push(resource);
                id
            }
            (None, None) => {
                return Err(CatalogError::Upstream {
                    action: "datastore_create".to_string(),
                    status: 409,
                    message: "resource_id or resource required".to_string(),
                });
            }
        };

        let page = with_row_identity(payload.fields.clone(), payload.records.clone());
        state.tables.insert(resource_id, page);
        Ok(())
    }

    async fn upload_resource(&self, op: ResourceOp, upload: ResourceUpload) -> CatalogResult<Value> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, op.action())?;

        let meta = upload.meta;
        let resource_id = match op {
            ResourceOp::Create => state.next_id("res"),
            ResourceOp::Patch => meta.id.clone().unwrap_or_default(),
        };
        let url = format!("{}/download/{}/{}", self.base, resource_id, upload.file_name);

        let mut record = json!({
            "id": resource_id,
            "package_id": meta.package_id,
            "name": meta.name,
            "format": meta.format,
            "url": url,
            "datastore_active": false,
        });

        match op {
            ResourceOp::Create => {
                let key = state
                    .package_key(&meta.package_id)
                    .ok_or_else(|| not_found(&meta.package_id))?;
                let pkg = state.packages.get_mut(&key).unwrap();
                pkg["resources"].as_array_mut().unwrap().push(record.clone());
            }
            ResourceOp::Patch => {
                let existing = state
                    .resource_mut(&resource_id)
                    .ok_or_else(|| not_found(&resource_id))?;
                for (field, value) in record.as_object().unwrap() {
                    existing.insert(field.clone(), value.clone());
                }
                record = Value::Object(existing.clone());
            }
        }

        state
            .files
            .insert(url, (upload.content, Some(upload.content_type)));
        Ok(record)
    }

    async fn fetch_file(&self, url: &str) -> CatalogResult<Download> {
        let mut state = self.state.lock().unwrap();
        self.record(&mut state, "fetch_file")?;
        let (content, content_type) = state
            .files
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Transport(format!("download of {url} failed: 404")))?;
        Ok(Download {
            content,
            content_type,
        })
    }
}
