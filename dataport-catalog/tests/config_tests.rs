use dataport_catalog::{CatalogConfig, CatalogError};
use pretty_assertions::assert_eq;

#[test]
fn config_default() {
    let cfg = CatalogConfig::default();
    assert_eq!(cfg.address, "http://localhost:5000");
    assert!(cfg.apikey.is_none());
    assert!(!cfg.is_production);
    assert!(cfg.organization.is_none());
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn config_deserializes_invocation_shape() {
    let cfg: CatalogConfig = serde_json::from_str(
        r#"{ "address": "https://ckan0.example.org/", "apikey": "secret" }"#,
    )
    .unwrap();
    assert_eq!(cfg.base_url(), "https://ckan0.example.org");
    assert_eq!(cfg.apikey.as_deref(), Some("secret"));
    assert!(!cfg.is_production);
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn config_accepts_aliases() {
    let cfg: CatalogConfig = serde_json::from_str(
        r#"{ "address": "https://prod.example.org", "api_key": "k", "isProduction": true }"#,
    )
    .unwrap();
    assert_eq!(cfg.apikey.as_deref(), Some("k"));
    assert!(cfg.is_production);
}

#[test]
fn package_url_is_canonical() {
    let cfg = CatalogConfig::new("https://target.example.org/", None);
    assert_eq!(cfg.package_url("ds1"), "https://target.example.org/dataset/ds1");
}

#[test]
fn validate_rejects_non_http_address() {
    let cfg = CatalogConfig::new("ftp://files.example.org", None);
    assert!(matches!(cfg.validate(), Err(CatalogError::Config(_))));

    let empty = CatalogConfig::new("", None);
    assert!(matches!(empty.validate(), Err(CatalogError::Config(_))));
}

#[test]
fn validate_rejects_zero_timeout() {
    let cfg = CatalogConfig {
        timeout_secs: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn not_found_helper() {
    assert!(CatalogError::NotFound("x".to_string()).is_not_found());
    assert!(!CatalogError::Transport("x".to_string()).is_not_found());
}
