//! Field projection from raw catalog records.
//!
//! Raw `package_show` results carry many instance-specific fields (ids,
//! timestamps, organization blocks, extras). Only the fields named in
//! [`PACKAGE_FIELDS`] and [`RESOURCE_FIELDS`] are carried over; everything
//! else is dropped. Projection builds new records and leaves the input
//! untouched.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{Error, FieldChange, ProjectedPackage, ProjectedResource, Result};

/// Package fields transmitted to the target.
pub const PACKAGE_FIELDS: &[&str] = &[
    "name",
    "title",
    "resources",
    "notes",
    "collection_method",
    "excerpt",
    "limitations",
    "dataset_category",
    "image_url",
    "information_url",
    "is_retired",
    "refresh_rate",
    "tags",
    "topics",
    "owner_division",
    "owner_section",
    "owner_unit",
    "owner_email",
];

/// Resource fields transmitted to the target.
pub const RESOURCE_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "datastore_active",
    "url",
    "extract_job",
    "format",
];

/// Projects a raw package record onto the migration whitelist.
///
/// Fails only if the record is not an object or lacks `id` or `name`;
/// unknown fields are silently dropped.
pub fn project_package(raw: &Value) -> Result<ProjectedPackage> {
    let obj = object(raw, "package")?;
    required(obj, "package", "id")?;

    let resources = match obj.get("resources") {
        Some(Value::Array(items)) => items
            .iter()
            .map(project_resource)
            .collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    Ok(ProjectedPackage {
        name: required(obj, "package", "name")?,
        title: text(obj, "title"),
        resources,
        notes: text(obj, "notes"),
        collection_method: text(obj, "collection_method"),
        excerpt: text(obj, "excerpt"),
        limitations: text(obj, "limitations"),
        dataset_category: text(obj, "dataset_category"),
        image_url: text(obj, "image_url"),
        information_url: text(obj, "information_url"),
        is_retired: value(obj, "is_retired"),
        refresh_rate: text(obj, "refresh_rate"),
        tags: obj.get("tags").and_then(flatten_tags),
        topics: value(obj, "topics"),
        owner_division: text(obj, "owner_division"),
        owner_section: text(obj, "owner_section"),
        owner_unit: text(obj, "owner_unit"),
        owner_email: text(obj, "owner_email"),
    })
}

/// Projects a raw resource record onto the migration whitelist.
pub fn project_resource(raw: &Value) -> Result<ProjectedResource> {
    let obj = object(raw, "resource")?;

    Ok(ProjectedResource {
        id: required(obj, "resource", "id")?,
        name: required(obj, "resource", "name")?,
        description: text(obj, "description"),
        datastore_active: flag(obj, "datastore_active"),
        url: text(obj, "url"),
        extract_job: value(obj, "extract_job"),
        format: text(obj, "format"),
    })
}

/// Flattens a tag list to a comma-joined string of tag names.
///
/// Accepts the catalog's list of `{ "name": .. }` records, a list of plain
/// strings, or an already-flat string. Returns `None` for null.
pub fn flatten_tags(tags: &Value) -> Option<String> {
    match tags {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|tag| match tag {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(o) => o.get("name").and_then(Value::as_str),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    }
}

/// Compares the metadata of two projected packages, ignoring resources.
///
/// `new` is the incoming (source) package and `old` the existing target.
pub fn diff_fields(new: &ProjectedPackage, old: &ProjectedPackage) -> BTreeMap<String, FieldChange> {
    let new = metadata_map(new);
    let old = metadata_map(old);
    let mut changes = BTreeMap::new();

    for (key, value) in &new {
        match old.get(key) {
            None => {
                changes.insert(key.clone(), FieldChange::Insert);
            }
            Some(existing) if existing != value => {
                changes.insert(key.clone(), FieldChange::Update);
            }
            Some(_) => {}
        }
    }

    for key in old.keys() {
        if !new.contains_key(key) {
            changes.insert(key.clone(), FieldChange::Delete);
        }
    }

    changes
}

fn metadata_map(package: &ProjectedPackage) -> Map<String, Value> {
    let (metadata, _) = package.clone().split_resources();
    match serde_json::to_value(metadata) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn object<'a>(raw: &'a Value, entity: &'static str) -> Result<&'a Map<String, Value>> {
    raw.as_object().ok_or(Error::NotAnObject { entity })
}

fn required(obj: &Map<String, Value>, entity: &'static str, field: &'static str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(Error::MissingField { entity, field }),
    }
}

fn text(obj: &Map<String, Value>, field: &str) -> Option<String> {
    match obj.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn value(obj: &Map<String, Value>, field: &str) -> Option<Value> {
    obj.get(field).filter(|v| !v.is_null()).cloned()
}

fn flag(obj: &Map<String, Value>, field: &str) -> Option<bool> {
    match obj.get(field)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
