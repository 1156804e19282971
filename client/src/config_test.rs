use std::collections::HashMap;

use super::*;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_is_development_defaults() {
    let cfg = ClientConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.app.environment, Environment::Development);
    assert_eq!(cfg.api.base_url, "http://localhost:8000/api");
    assert_eq!(cfg.api.timeout, Duration::from_millis(10_000));
    assert_eq!(cfg.api.retry, RetryPolicy::default());
    assert_eq!(cfg.auth.access_token_key, "clinic_access_token");
    assert_eq!(cfg.auth.refresh_token_key, "clinic_refresh_token");
    assert_eq!(cfg.auth.expiry_buffer, Duration::from_secs(300));
    assert!(cfg.features.notifications);
    assert!(!cfg.features.offline_mode);
    assert!(!cfg.features.analytics);
}

#[test]
fn development_ignores_base_url_override() {
    let cfg = ClientConfig::from_lookup(lookup(&[("CLINIC_API_BASE_URL", "https://prod.example/api")])).unwrap();
    assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
}

#[test]
fn production_requires_base_url() {
    let err = ClientConfig::from_lookup(lookup(&[("CLINIC_ENV", "production")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing { var: "CLINIC_API_BASE_URL" });

    let err = ClientConfig::from_lookup(lookup(&[("CLINIC_ENV", "production"), ("CLINIC_API_BASE_URL", "  ")]))
        .unwrap_err();
    assert_eq!(err, ConfigError::Missing { var: "CLINIC_API_BASE_URL" });
}

#[test]
fn production_uses_base_url_and_enables_analytics() {
    let cfg = ClientConfig::from_lookup(lookup(&[
        ("CLINIC_ENV", "production"),
        ("CLINIC_API_BASE_URL", "https://clinic.example/api/"),
    ]))
    .unwrap();
    assert_eq!(cfg.api.base_url, "https://clinic.example/api");
    assert!(cfg.features.analytics);
}

#[test]
fn test_environment_falls_back_to_local_backend() {
    let cfg = ClientConfig::from_lookup(lookup(&[("CLINIC_ENV", "test")])).unwrap();
    assert_eq!(cfg.app.environment, Environment::Test);
    assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    assert!(!cfg.features.analytics);
}

#[test]
fn unknown_environment_is_rejected() {
    let err = ClientConfig::from_lookup(lookup(&[("CLINIC_ENV", "staging")])).unwrap_err();
    assert_eq!(err, ConfigError::UnknownEnvironment("staging".to_owned()));
}

#[test]
fn numeric_overrides() {
    let cfg = ClientConfig::from_lookup(lookup(&[
        ("CLINIC_API_TIMEOUT_MS", "2500"),
        ("CLINIC_API_RETRY_ATTEMPTS", "5"),
        ("CLINIC_API_RETRY_DELAY_MS", " 250 "),
    ]))
    .unwrap();
    assert_eq!(cfg.api.timeout, Duration::from_millis(2500));
    assert_eq!(cfg.api.retry, RetryPolicy::new(5, Duration::from_millis(250)));
}

#[test]
fn malformed_number_names_the_variable() {
    let err = ClientConfig::from_lookup(lookup(&[("CLINIC_API_RETRY_ATTEMPTS", "three")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidNumber { var: "CLINIC_API_RETRY_ATTEMPTS", value: "three".to_owned() });
    assert!(err.to_string().contains("CLINIC_API_RETRY_ATTEMPTS"));
}

#[test]
fn page_size_is_defaulted_and_capped() {
    let pagination = ClientConfig::default().pagination;
    assert_eq!(pagination.page_size(None), 10);
    assert_eq!(pagination.page_size(Some(0)), 10);
    assert_eq!(pagination.page_size(Some(25)), 25);
    assert_eq!(pagination.page_size(Some(1000)), 100);
}

#[test]
fn upload_limits() {
    let upload = ClientConfig::default().upload;
    assert_eq!(upload.max_files, 5);
    assert!(upload.accepts("application/pdf", 1024));
    assert!(upload.accepts("image/png", MAX_UPLOAD_BYTES));
    assert!(!upload.accepts("image/png", MAX_UPLOAD_BYTES + 1));
    assert!(!upload.accepts("text/plain", 10));
}
