// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Vanish.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vanish configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VanishConfig {
    /// HTTP listener and admin access settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Encryption key settings.
    #[serde(default)]
    pub encryption: EncryptionConfig,

    /// Secret lifetime and size limits.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Per-client rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Expiry sweep scheduling.
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL used when building share links.
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Bearer token for `/admin` endpoints. `None` rejects every admin request.
    #[serde(default)]
    pub admin_token: Option<String>,

    /// Trust `X-Forwarded-For` and related headers for client identity.
    /// Enable only behind a reverse proxy that overwrites them.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
            admin_token: None,
            trust_proxy_headers: false,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("public_url", &self.public_url)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "[redacted]"))
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .finish()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vanish").join("vanish.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("vanish.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Encryption configuration.
///
/// Rotating the key makes every stored secret undecryptable.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptionConfig {
    /// 64 hex characters (32 bytes). Generate with `vanish generate-key`.
    #[serde(default)]
    pub key: Option<String>,
}

impl std::fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("key", &self.key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Secret lifetime and size configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    /// Seconds a secret stays retrievable (default: 86400 = 24h).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum secret length in characters.
    #[serde(default = "default_max_secret_chars")]
    pub max_secret_chars: usize,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_secret_chars: default_max_secret_chars(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    86_400
}

fn default_max_secret_chars() -> usize {
    2000
}

/// Fixed-window rate limiting configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Enable rate limiting of secret creation.
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// Maximum create requests per client per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Salt mixed into client address hashes. When unset, a random salt is
    /// generated at startup and held for the lifetime of the process.
    #[serde(default)]
    pub identity_salt: Option<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            identity_salt: None,
        }
    }
}

impl std::fmt::Debug for RateLimitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitConfig")
            .field("enabled", &self.enabled)
            .field("max_requests", &self.max_requests)
            .field("window_secs", &self.window_secs)
            .field("identity_salt", &self.identity_salt.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    3600
}

/// Expiry sweep configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CleanupConfig {
    /// Seconds between periodic sweeps (default: hourly).
    #[serde(default = "default_cleanup_interval_secs")]
    pub interval_secs: u64,

    /// Also sweep expired secrets right after each successful create.
    #[serde(default = "default_sweep_on_write")]
    pub sweep_on_write: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_cleanup_interval_secs(),
            sweep_on_write: default_sweep_on_write(),
        }
    }
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}

fn default_sweep_on_write() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log sweep counts and cipher failure details.
    #[serde(default)]
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            debug: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
