// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as key format, non-zero limits, and valid bind hosts.

use crate::diagnostic::ConfigError;
use crate::model::VanishConfig;

/// Longest lifetime a secret may be given: one year.
pub const MAX_TTL_SECS: u64 = 365 * 24 * 3600;

/// Longest rate-limit window: seven days, matching rate-limit record retention.
pub const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 7 * 24 * 3600;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &VanishConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    let public_url = config.server.public_url.trim();
    if !(public_url.starts_with("http://") || public_url.starts_with("https://")) {
        fail(format!(
            "server.public_url must start with http:// or https://, got `{public_url}`"
        ));
    }

    if config.server.admin_token.as_ref().is_some_and(|t| t.len() < 16) {
        fail("server.admin_token must be at least 16 characters".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.encryption.key.as_deref().is_some_and(|k| !is_hex_key(k)) {
        fail(
            "encryption.key must be 64 hexadecimal characters (generate one with `vanish generate-key`)"
                .to_string(),
        );
    }

    if config.secrets.ttl_secs == 0 {
        fail("secrets.ttl_secs must be greater than 0".to_string());
    } else if config.secrets.ttl_secs > MAX_TTL_SECS {
        fail(format!("secrets.ttl_secs must be at most {MAX_TTL_SECS}"));
    }

    if config.secrets.max_secret_chars == 0 {
        fail("secrets.max_secret_chars must be greater than 0".to_string());
    }

    if config.rate_limit.max_requests == 0 {
        fail("rate_limit.max_requests must be greater than 0".to_string());
    }

    if config.rate_limit.window_secs == 0 {
        fail("rate_limit.window_secs must be greater than 0".to_string());
    } else if config.rate_limit.window_secs > MAX_RATE_LIMIT_WINDOW_SECS {
        fail(format!(
            "rate_limit.window_secs must be at most {MAX_RATE_LIMIT_WINDOW_SECS}"
        ));
    }

    if config.cleanup.interval_secs == 0 {
        fail("cleanup.interval_secs must be greater than 0".to_string());
    }

    if !matches!(
        config.logging.level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        fail(format!(
            "logging.level must be one of trace, debug, info, warn, error; got `{}`",
            config.logging.level
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True when `key` is exactly 64 hex characters.
pub fn is_hex_key(key: &str) -> bool {
    key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = VanishConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = VanishConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn short_encryption_key_fails_validation() {
        let mut config = VanishConfig::default();
        config.encryption.key = Some("abcd".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "encryption.key"));
    }

    #[test]
    fn non_hex_encryption_key_fails_validation() {
        let mut config = VanishConfig::default();
        config.encryption.key = Some("z".repeat(64));
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn valid_encryption_key_passes() {
        let mut config = VanishConfig::default();
        config.encryption.key = Some("0123456789abcdefABCDEF".repeat(3)[..64].to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_limits_collect_all_errors() {
        let mut config = VanishConfig::default();
        config.secrets.ttl_secs = 0;
        config.rate_limit.window_secs = 0;
        config.rate_limit.max_requests = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "ttl_secs"));
        assert!(has_error(&errors, "window_secs"));
        assert!(has_error(&errors, "max_requests"));
    }

    #[test]
    fn oversized_durations_fail_validation() {
        let mut config = VanishConfig::default();
        config.secrets.ttl_secs = u64::MAX;
        config.rate_limit.window_secs = i64::MAX as u64;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "ttl_secs must be at most"));
        assert!(has_error(&errors, "window_secs must be at most"));
    }

    #[test]
    fn durations_at_their_maximum_pass() {
        let mut config = VanishConfig::default();
        config.secrets.ttl_secs = MAX_TTL_SECS;
        config.rate_limit.window_secs = MAX_RATE_LIMIT_WINDOW_SECS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_public_url_fails_validation() {
        let mut config = VanishConfig::default();
        config.server.public_url = "example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "public_url"));
    }

    #[test]
    fn short_admin_token_fails_validation() {
        let mut config = VanishConfig::default();
        config.server.admin_token = Some("short".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "admin_token"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = VanishConfig::default();
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "logging.level"));
    }
}
