//! HTTP implementation of the catalog action API.

use std::time::Duration;

use async_trait::async_trait;
use dataport_types::{DatastoreCreate, DatastorePage, PackageSummary};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::api::{CatalogApi, Download, ResourceOp, ResourceUpload};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};

const NOT_FOUND_ERROR: &str = "Not Found Error";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Action API response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ActionError>,
}

#[derive(Debug, Deserialize)]
struct ActionError {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<Value>,
}

impl ActionError {
    fn describe(&self) -> String {
        match (&self.kind, &self.message) {
            (Some(kind), Some(Value::String(msg))) => format!("{kind}: {msg}"),
            (Some(kind), Some(other)) => format!("{kind}: {other}"),
            (Some(kind), None) => kind.clone(),
            (None, Some(msg)) => msg.to_string(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// A catalog instance reached over HTTP.
pub struct RemoteCatalog {
    config: CatalogConfig,
    client: Client,
}

impl RemoteCatalog {
    /// Creates a handle for the configured instance.
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// The settings this handle was built from.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/api/3/action/{}", self.config.base_url(), action)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.apikey {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn get_action<T: DeserializeOwned>(
        &self,
        action: &str,
        query: &[(&str, &str)],
    ) -> CatalogResult<T> {
        debug!("GET {} {:?}", action, query);

        let response = self
            .authorize(self.client.get(self.action_url(action)))
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(format!("{action} failed: {e}")))?;

        read_result(action, response).await
    }

    async fn post_action<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        action: &str,
        body: &B,
    ) -> CatalogResult<T> {
        debug!("POST {}", action);

        let response = self
            .authorize(self.client.post(self.action_url(action)))
            .json(body)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(format!("{action} failed: {e}")))?;

        read_result(action, response).await
    }
}

/// Unwraps the action envelope, mapping failures onto [`CatalogError`].
async fn read_result<T: DeserializeOwned>(action: &str, response: Response) -> CatalogResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CatalogError::Transport(format!("reading {action} response failed: {e}")))?;

    let envelope: Option<Envelope> = serde_json::from_str(&body).ok();

    if let Some(Envelope {
        success: true,
        result,
        ..
    }) = envelope.as_ref().filter(|_| status.is_success())
    {
        let result = result.clone().unwrap_or(Value::Null);
        return Ok(serde_json::from_value(result)?);
    }

    let error = envelope.and_then(|e| e.error);
    let is_not_found = status == StatusCode::NOT_FOUND
        || error
            .as_ref()
            .and_then(|e| e.kind.as_deref())
            .is_some_and(|kind| kind == NOT_FOUND_ERROR);

    let message = match &error {
        Some(error) => error.describe(),
        None if body.is_empty() => status.to_string(),
        None => body,
    };

    if is_not_found {
        return Err(CatalogError::NotFound(format!("{action}: {message}")));
    }

    Err(CatalogError::Upstream {
        action: action.to_string(),
        status: status.as_u16(),
        message,
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl CatalogApi for RemoteCatalog {
    fn base_url(&self) -> &str {
        self.config.base_url()
    }

    fn is_production(&self) -> bool {
        self.config.is_production
    }

    fn organization(&self) -> Option<&str> {
        self.config.organization.as_deref()
    }

    fn package_url(&self, name: &str) -> String {
        self.config.package_url(name)
    }

    async fn package_show(&self, id: &str) -> CatalogResult<Value> {
        self.get_action("package_show", &[("id", id)]).await
    }

    async fn package_create(&self, package: &Value) -> CatalogResult<PackageSummary> {
        let created: PackageSummary = self.post_action("package_create", package).await?;
        info!("Created package {} (id: {})", created.name, created.id);
        Ok(created)
    }

    async fn package_patch(&self, package: &Value) -> CatalogResult<PackageSummary> {
        let patched: PackageSummary = self.post_action("package_patch", package).await?;
        info!("Patched package {} (id: {})", patched.name, patched.id);
        Ok(patched)
    }

    async fn package_purge(&self, id: &str) -> CatalogResult<()> {
        let _: Value = self.post_action("dataset_purge", &json!({ "id": id })).await?;
        info!("Purged package {}", id);
        Ok(())
    }

    async fn resource_delete(&self, id: &str) -> CatalogResult<()> {
        let _: Value = self.post_action("resource_delete", &json!({ "id": id })).await?;
        debug!("Deleted resource {}", id);
        Ok(())
    }

    async fn organization_show(&self, id: &str) -> CatalogResult<Value> {
        self.get_action("organization_show", &[("id", id)]).await
    }

    async fn datastore_search(&self, resource_id: &str, limit: u64) -> CatalogResult<DatastorePage> {
        let limit = limit.to_string();
        self.get_action(
            "datastore_search",
            &[
                ("resource_id", resource_id),
                ("limit", limit.as_str()),
                ("include_total", "true"),
            ],
        )
        .await
    }

    async fn datastore_delete(&self, resource_id: &str) -> CatalogResult<()> {
        let _: Value = self
            .post_action(
                "datastore_delete",
                &json!({ "resource_id": resource_id, "force": true }),
            )
            .await?;
        debug!("Deleted table for resource {}", resource_id);
        Ok(())
    }

    async fn datastore_create(&self, payload: &DatastoreCreate) -> CatalogResult<()> {
        let _: Value = self.post_action("datastore_create", payload).await?;
        debug!("Created table with {} rows", payload.records.len());
        Ok(())
    }

    async fn upload_resource(&self, op: ResourceOp, upload: ResourceUpload) -> CatalogResult<Value> {
        let action = op.action();
        let meta = upload.meta;

        debug!(
            "Uploading {} ({} bytes) via {}",
            upload.file_name,
            upload.content.len(),
            action
        );

        let mut form = Form::new()
            .text("package_id", meta.package_id)
            .text("name", meta.name);
        if let Some(id) = meta.id {
            form = form.text("id", id);
        }
        if let Some(description) = meta.description {
            form = form.text("description", description);
        }
        if let Some(format) = meta.format {
            form = form.text("format", format);
        }
        if let Some(extract_job) = meta.extract_job.as_ref().filter(|v| !v.is_null()) {
            form = form.text("extract_job", value_text(extract_job));
        }

        let content_type = if Part::text("").mime_str(&upload.content_type).is_ok() {
            upload.content_type.as_str()
        } else {
            warn!(
                "Unparseable content type {:?} for {}; sending {}",
                upload.content_type, upload.file_name, FALLBACK_CONTENT_TYPE
            );
            FALLBACK_CONTENT_TYPE
        };
        let part = Part::bytes(upload.content)
            .file_name(upload.file_name)
            .mime_str(content_type)
            .map_err(|e| CatalogError::Transport(format!("invalid content type: {e}")))?;
        form = form.part("upload", part);

        let response = self
            .authorize(self.client.post(self.action_url(action)))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(format!("upload failed: {e}")))?;

        read_result(action, response).await
    }

    async fn fetch_file(&self, url: &str) -> CatalogResult<Download> {
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(format!("download of {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CatalogError::Transport(format!(
                "download of {url} failed: {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(format!("reading {url} failed: {e}")))?;

        Ok(Download {
            content: bytes.to_vec(),
            content_type,
        })
    }
}
