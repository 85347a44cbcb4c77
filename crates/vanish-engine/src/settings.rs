// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime settings for the lifecycle engine.
//!
//! Seeded from [`VanishConfig`] at startup and replaceable afterwards through
//! [`SettingsUpdate`]. Requests read an immutable snapshot.

use serde::{Deserialize, Serialize};
use vanish_config::validation::{MAX_RATE_LIMIT_WINDOW_SECS, MAX_TTL_SECS, is_hex_key};
use vanish_config::VanishConfig;
use vanish_core::VanishError;
use vanish_ratelimit::RateLimitPolicy;
use zeroize::Zeroizing;

/// Settings snapshot consulted by every engine operation.
#[derive(Clone)]
pub struct EngineSettings {
    pub encryption_key: Option<Zeroizing<String>>,
    pub ttl_secs: u64,
    pub max_secret_chars: usize,
    pub rate_limit: RateLimitPolicy,
    /// Base URL for share links, without trailing slash.
    pub public_url: String,
    pub sweep_on_write: bool,
    pub debug: bool,
}

impl EngineSettings {
    pub fn from_config(config: &VanishConfig) -> Self {
        Self {
            encryption_key: config
                .encryption
                .key
                .as_ref()
                .map(|k| Zeroizing::new(k.clone())),
            ttl_secs: config.secrets.ttl_secs,
            max_secret_chars: config.secrets.max_secret_chars,
            rate_limit: RateLimitPolicy {
                enabled: config.rate_limit.enabled,
                max_requests: config.rate_limit.max_requests,
                window_secs: config.rate_limit.window_secs,
            },
            public_url: config.server.public_url.trim_end_matches('/').to_string(),
            sweep_on_write: config.cleanup.sweep_on_write,
            debug: config.logging.debug,
        }
    }

    /// Share link handed back to the creator.
    pub fn secret_url(&self, token: &str) -> String {
        format!("{}/?token={token}", self.public_url)
    }

    /// Serializable view with the key reduced to a flag.
    pub fn view(&self) -> SettingsView {
        SettingsView {
            key_configured: self.encryption_key.as_ref().is_some_and(|k| !k.is_empty()),
            ttl_secs: self.ttl_secs,
            max_secret_chars: self.max_secret_chars,
            rate_limit_enabled: self.rate_limit.enabled,
            rate_limit_max_requests: self.rate_limit.max_requests,
            rate_limit_window_secs: self.rate_limit.window_secs,
            public_url: self.public_url.clone(),
            sweep_on_write: self.sweep_on_write,
            debug: self.debug,
        }
    }

    /// A copy with every field present in `update` replaced.
    ///
    /// `update` must already have passed [`SettingsUpdate::validate`].
    pub(crate) fn apply(&self, update: &SettingsUpdate) -> Self {
        let mut next = self.clone();
        if let Some(key) = &update.encryption_key {
            next.encryption_key = Some(Zeroizing::new(key.trim().to_string()));
        }
        if let Some(ttl) = update.ttl_secs {
            next.ttl_secs = ttl;
        }
        if let Some(max) = update.max_secret_chars {
            next.max_secret_chars = max;
        }
        if let Some(enabled) = update.rate_limit_enabled {
            next.rate_limit.enabled = enabled;
        }
        if let Some(max) = update.rate_limit_max_requests {
            next.rate_limit.max_requests = max;
        }
        if let Some(window) = update.rate_limit_window_secs {
            next.rate_limit.window_secs = window;
        }
        if let Some(sweep) = update.sweep_on_write {
            next.sweep_on_write = sweep;
        }
        if let Some(debug) = update.debug {
            next.debug = debug;
        }
        next
    }
}

impl std::fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSettings")
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "[redacted]"))
            .field("ttl_secs", &self.ttl_secs)
            .field("max_secret_chars", &self.max_secret_chars)
            .field("rate_limit", &self.rate_limit)
            .field("public_url", &self.public_url)
            .field("sweep_on_write", &self.sweep_on_write)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Settings as reported to administrators. Never contains the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub key_configured: bool,
    pub ttl_secs: u64,
    pub max_secret_chars: usize,
    pub rate_limit_enabled: bool,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub public_url: String,
    pub sweep_on_write: bool,
    pub debug: bool,
}

/// Partial settings change. Absent fields keep their current value.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsUpdate {
    pub encryption_key: Option<String>,
    pub ttl_secs: Option<u64>,
    pub max_secret_chars: Option<usize>,
    pub rate_limit_enabled: Option<bool>,
    pub rate_limit_max_requests: Option<u32>,
    pub rate_limit_window_secs: Option<u64>,
    pub sweep_on_write: Option<bool>,
    pub debug: Option<bool>,
}

impl SettingsUpdate {
    /// Reject the whole update if any supplied field is out of range.
    pub fn validate(&self) -> Result<(), VanishError> {
        let mut problems: Vec<String> = Vec::new();
        let mut fail = |problem: &str| problems.push(problem.to_string());

        if self
            .encryption_key
            .as_deref()
            .is_some_and(|key| !is_hex_key(key.trim()))
        {
            fail("encryption_key must be a 64-character hexadecimal string");
        }
        if self.ttl_secs == Some(0) {
            fail("ttl_secs must be greater than 0");
        }
        if self.ttl_secs.is_some_and(|ttl| ttl > MAX_TTL_SECS) {
            fail(&format!("ttl_secs must be at most {MAX_TTL_SECS}"));
        }
        if self.max_secret_chars == Some(0) {
            fail("max_secret_chars must be greater than 0");
        }
        if self.rate_limit_max_requests == Some(0) {
            fail("rate_limit_max_requests must be greater than 0");
        }
        if self.rate_limit_window_secs == Some(0) {
            fail("rate_limit_window_secs must be greater than 0");
        }
        if self
            .rate_limit_window_secs
            .is_some_and(|window| window > MAX_RATE_LIMIT_WINDOW_SECS)
        {
            fail(&format!(
                "rate_limit_window_secs must be at most {MAX_RATE_LIMIT_WINDOW_SECS}"
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(VanishError::Config(problems.join("; ")))
        }
    }

    pub fn changes_key(&self) -> bool {
        self.encryption_key.is_some()
    }
}

impl std::fmt::Debug for SettingsUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsUpdate")
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "[redacted]"))
            .field("ttl_secs", &self.ttl_secs)
            .field("max_secret_chars", &self.max_secret_chars)
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("sweep_on_write", &self.sweep_on_write)
            .field("debug", &self.debug)
            .finish()
    }
}
