use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn from_lookup_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "/home/alice")])).unwrap();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.data_dir, PathBuf::from("/home/alice/.recipe-book"));
    assert_eq!(cfg.timeouts, Timeouts::default());
}

#[test]
fn from_lookup_without_home_uses_working_dir() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("./.recipe-book"));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("RECIPE_API_BASE_URL", "http://127.0.0.1:4000/"),
        ("RECIPE_DATA_DIR", "/tmp/recipes"),
        ("RECIPE_REQUEST_TIMEOUT_SECS", "42"),
        ("RECIPE_CONNECT_TIMEOUT_SECS", " 7 "),
    ]))
    .unwrap();
    assert_eq!(cfg.api_base_url, "http://127.0.0.1:4000");
    assert_eq!(cfg.data_dir, PathBuf::from("/tmp/recipes"));
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_bad_timeouts_fall_back_to_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("RECIPE_REQUEST_TIMEOUT_SECS", "soon"),
        ("RECIPE_CONNECT_TIMEOUT_SECS", "-1"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts, Timeouts::default());
}

#[test]
fn from_lookup_blank_data_dir_uses_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("RECIPE_DATA_DIR", "  "), ("HOME", "/h")])).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/h/.recipe-book"));
}

#[test]
fn from_lookup_rejects_non_http_base_url() {
    let err = ClientConfig::from_lookup(lookup_from(&[("RECIPE_API_BASE_URL", "ftp://example.test")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidBaseUrl("ftp://example.test".to_owned()));
    assert!(err.to_string().contains("expected http:// or https://"));
}

// =============================================================================
// with_overrides
// =============================================================================

#[test]
fn with_overrides_replaces_given_values_only() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "/h")]))
        .unwrap()
        .with_overrides(Some("https://api.example.test//"), None)
        .unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.test");
    assert_eq!(cfg.data_dir, PathBuf::from("/h/.recipe-book"));

    let cfg = cfg.with_overrides(None, Some(PathBuf::from("/data"))).unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.test");
    assert_eq!(cfg.data_dir, PathBuf::from("/data"));
}

#[test]
fn with_overrides_validates_base_url() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert!(cfg.with_overrides(Some("localhost:3000"), None).is_err());
}

// =============================================================================
// from_env: uses the real environment, only asserts on values it controls.
// =============================================================================

#[test]
fn from_env_reads_connect_timeout() {
    unsafe { std::env::set_var("RECIPE_CONNECT_TIMEOUT_SECS", "3") };
    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.connect_secs, 3);
    unsafe { std::env::remove_var("RECIPE_CONNECT_TIMEOUT_SECS") };
}
