//! Configuration loading from secrets files.

use std::io::Write;

use tempfile::TempDir;

use betfund_stripe::{StripeClient, StripeConfig};

fn no_env(_: &str) -> Option<String> {
    None
}

fn write_secrets(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("stripe.json");
    let mut file = std::fs::File::create(&path).expect("Failed to create secrets file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write secrets file");
    path
}

#[test]
fn secrets_file_supplies_key() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_secrets(&dir, r#"{"api_key": "sk_test_file"}"#);

    let config = StripeConfig::load(&[path], no_env).unwrap();

    assert_eq!(config.api_key, "sk_test_file");
    assert_eq!(config.api_base, StripeClient::BASE_URL);
}

#[test]
fn secrets_file_wins_over_environment() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_secrets(
        &dir,
        r#"{"api_key": "sk_test_file", "api_base": "http://localhost:12111/v1"}"#,
    );

    let config = StripeConfig::load(&[path], |name| match name {
        "STRIPE_API_KEY" => Some("sk_test_env".to_string()),
        "STRIPE_API_BASE" => Some("http://env.invalid/v1".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.api_key, "sk_test_file");
    assert_eq!(config.api_base, "http://localhost:12111/v1");
}

#[test]
fn first_readable_file_is_used() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let present = write_secrets(&dir, r#"{"api_key": "sk_test_second"}"#);
    let missing = dir.path().join("missing.json");

    let config = StripeConfig::load(&[missing, present], no_env).unwrap();

    assert_eq!(config.api_key, "sk_test_second");
}

#[test]
fn malformed_file_falls_back_to_environment() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_secrets(&dir, "not json");

    let config = StripeConfig::load(&[path], |name| {
        (name == "STRIPE_API_KEY").then(|| "sk_test_env".to_string())
    })
    .unwrap();

    assert_eq!(config.api_key, "sk_test_env");
}

#[test]
fn blank_file_key_falls_back_to_environment() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_secrets(
        &dir,
        r#"{"api_key": "  ", "api_base": "http://localhost:12111/v1"}"#,
    );

    let config = StripeConfig::load(&[path], |name| {
        (name == "STRIPE_API_KEY").then(|| "sk_test_env".to_string())
    })
    .unwrap();

    assert_eq!(config.api_key, "sk_test_env");
    assert_eq!(config.api_base, "http://localhost:12111/v1");
}

#[test]
fn blank_file_key_without_environment_is_missing() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_secrets(&dir, r#"{"api_key": ""}"#);

    let err = StripeConfig::load(&[path], no_env).unwrap_err();

    assert!(matches!(err, betfund_stripe::ConfigError::MissingApiKey));
}

#[test]
fn client_builds_from_config() {
    let mut config = StripeConfig::new("sk_test_xxx");
    config.api_base = "http://localhost:12111/v1/".into();
    config.timeout_seconds = 5;

    let client = StripeClient::from_config(&config).unwrap();

    assert_eq!(client.base_url(), "http://localhost:12111/v1");
}
