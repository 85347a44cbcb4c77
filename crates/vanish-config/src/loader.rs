// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vanish.toml` > `~/.config/vanish/vanish.toml` > `/etc/vanish/vanish.toml`
//! with environment variable overrides via `VANISH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VanishConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vanish/vanish.toml` (system-wide)
/// 3. `~/.config/vanish/vanish.toml` (user XDG config)
/// 4. `./vanish.toml` (local directory)
/// 5. `VANISH_*` environment variables
pub fn load_config() -> Result<VanishConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<VanishConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VanishConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VanishConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VanishConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VanishConfig::default()))
        .merge(Toml::file("/etc/vanish/vanish.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vanish/vanish.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vanish.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `VANISH_RATE_LIMIT_MAX_REQUESTS` must map to
/// `rate_limit.max_requests`.
fn env_provider() -> Env {
    Env::prefixed("VANISH_").map(|key| map_env_key(key.as_str()).into())
}

const SECTIONS: &[&str] = &[
    "server",
    "storage",
    "encryption",
    "secrets",
    "rate_limit",
    "cleanup",
    "logging",
];

/// Map a lowercased, prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        let rest = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
            .filter(|r| !r.is_empty());
        if let Some(rest) = rest {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
