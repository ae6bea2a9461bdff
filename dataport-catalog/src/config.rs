//! Per-instance connection settings.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// Connection settings for one catalog instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base address, e.g. `https://ckan.example.org`.
    pub address: String,
    /// API credential, sent as a bearer token on authenticated actions.
    #[serde(default, alias = "api_key", skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    /// Production instances are never purged by source cleanup.
    #[serde(default, alias = "isProduction")]
    pub is_production: bool,
    /// Owner organization name to assign on this instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:5000".to_string(),
            apikey: None,
            is_production: false,
            organization: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    /// Config for `address` with an optional credential.
    pub fn new(address: impl Into<String>, apikey: Option<String>) -> Self {
        Self {
            address: address.into(),
            apikey,
            ..Default::default()
        }
    }

    /// The address without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.address.trim_end_matches('/')
    }

    /// Canonical browsing URL of a package.
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/dataset/{}", self.base_url(), name)
    }

    /// Checks that the address is an http(s) URL.
    pub fn validate(&self) -> CatalogResult<()> {
        let base = self.base_url();
        if base.is_empty() {
            return Err(CatalogError::Config("catalog address is empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CatalogError::Config(format!(
                "catalog address must be http(s): {base}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CatalogError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
