// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Vanish configuration system.

use std::path::Path;

use vanish_config::diagnostic::ConfigError;
use vanish_config::model::VanishConfig;
use vanish_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

const KEY: &str = "6f1c2a9e4b7d8035c1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4";

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_vanish_config() {
    let toml = format!(
        r#"
[server]
host = "0.0.0.0"
port = 9000
public_url = "https://share.example.com"
admin_token = "admin-token-0123456789"
trust_proxy_headers = true

[storage]
database_path = "/tmp/vanish-test.db"
wal_mode = false

[encryption]
key = "{KEY}"

[secrets]
ttl_secs = 3600
max_secret_chars = 500

[rate_limit]
enabled = true
max_requests = 10
window_secs = 600
identity_salt = "pepper"

[cleanup]
interval_secs = 900
sweep_on_write = false

[logging]
level = "debug"
debug = true
"#
    );

    let config = load_config_from_str(&toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.public_url, "https://share.example.com");
    assert!(config.server.trust_proxy_headers);
    assert_eq!(config.storage.database_path, "/tmp/vanish-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.encryption.key.as_deref(), Some(KEY));
    assert_eq!(config.secrets.ttl_secs, 3600);
    assert_eq!(config.secrets.max_secret_chars, 500);
    assert_eq!(config.rate_limit.max_requests, 10);
    assert_eq!(config.rate_limit.window_secs, 600);
    assert_eq!(config.rate_limit.identity_salt.as_deref(), Some("pepper"));
    assert_eq!(config.cleanup.interval_secs, 900);
    assert!(!config.cleanup.sweep_on_write);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.debug);
}

/// Empty input yields the documented defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config should load");
    assert_eq!(config.server.port, 8080);
    assert!(config.encryption.key.is_none());
    assert_eq!(config.secrets.ttl_secs, 86_400);
    assert_eq!(config.secrets.max_secret_chars, 2000);
    assert!(config.rate_limit.enabled);
    assert_eq!(config.rate_limit.max_requests, 5);
    assert_eq!(config.rate_limit.window_secs, 3600);
    assert_eq!(config.cleanup.interval_secs, 3600);
    assert!(config.cleanup.sweep_on_write);
    assert!(!config.logging.debug);
}

/// Unknown keys are rejected with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let errors = load_and_validate_str("[secrets]\nttl_sec = 60\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "ttl_sec");
            assert_eq!(suggestion.as_deref(), Some("ttl_secs"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level sections are rejected.
#[test]
fn unknown_section_is_rejected() {
    let result = load_config_from_str("[telemetry]\nenabled = true\n");
    assert!(result.is_err());
}

/// Wrong value types surface as InvalidType.
#[test]
fn wrong_type_produces_invalid_type() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "server.port")));
}

/// Semantic validation runs after deserialization.
#[test]
fn invalid_key_fails_validation() {
    let errors = load_and_validate_str("[encryption]\nkey = \"not-hex\"\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("encryption.key"))));
}

/// A missing explicit config file is reported, not silently defaulted.
#[test]
fn missing_config_path_is_unreadable() {
    let errors = load_and_validate_path(Path::new("/nonexistent/vanish.toml")).unwrap_err();
    assert!(matches!(&errors[0], ConfigError::Unreadable { path } if path.contains("nonexistent")));
}

/// Debug output never prints secrets.
#[test]
fn debug_output_redacts_secrets() {
    let mut config = VanishConfig::default();
    config.encryption.key = Some(KEY.to_string());
    config.server.admin_token = Some("admin-token-0123456789".to_string());
    config.rate_limit.identity_salt = Some("pepper-value".to_string());

    let debug = format!("{config:?}");
    assert!(!debug.contains(KEY));
    assert!(!debug.contains("admin-token-0123456789"));
    assert!(!debug.contains("pepper-value"));
    assert!(debug.contains("[redacted]"));
}

/// A serialized config is itself a loadable config file.
#[test]
fn serialized_config_reloads() {
    let mut config = VanishConfig::default();
    config.secrets.ttl_secs = 600;
    config.encryption.key = Some(KEY.to_string());

    let rendered = toml::to_string(&config).unwrap();
    let back = load_and_validate_str(&rendered).unwrap();
    assert_eq!(back.secrets.ttl_secs, 600);
    assert_eq!(back.encryption.key.as_deref(), Some(KEY));
    assert_eq!(back.server.host, "127.0.0.1");
}
