// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the engine, storage, and gateway crates.
//!
//! All timestamps are Unix seconds (UTC).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Rate-limit records older than this are swept regardless of window length.
pub const RATE_LIMIT_RETENTION_SECS: u64 = 7 * 24 * 3600;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Scheduler,
}

/// A persisted, encrypted secret.
///
/// Records are write-once: there is no update path. Debug output omits the
/// ciphertext and IV.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// 32 lowercase hex characters.
    pub token: String,
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
    pub created_at: i64,
    pub expires_at: i64,
}

impl SecretRecord {
    /// A record is live while `now < expires_at`.
    pub fn is_live(&self, now: i64) -> bool {
        now < self.expires_at
    }

    /// Seconds until expiry, floored at zero.
    pub fn time_remaining(&self, now: i64) -> u64 {
        (self.expires_at - now).max(0) as u64
    }
}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("token", &self.token)
            .field("ciphertext_len", &self.ciphertext.len())
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RateDecision {
    Allowed,
    Denied { retry_after_secs: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Fixed-window request counter for one client identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Salted SHA-256 of the client address, hex encoded.
    pub identity_hash: String,
    pub request_count: u32,
    pub window_start: i64,
}

impl RateLimitRecord {
    /// Apply one request to the (possibly absent) current record.
    ///
    /// Returns the decision and, when the request is allowed, the record state
    /// that must be persisted. Denied requests leave the record untouched.
    pub fn evaluate(
        existing: Option<&RateLimitRecord>,
        identity_hash: &str,
        now: i64,
        max_requests: u32,
        window_secs: u64,
    ) -> (RateDecision, Option<RateLimitRecord>) {
        let fresh = || RateLimitRecord {
            identity_hash: identity_hash.to_string(),
            request_count: 1,
            window_start: now,
        };

        let Some(record) = existing else {
            return (RateDecision::Allowed, Some(fresh()));
        };

        let window = i64::try_from(window_secs).unwrap_or(i64::MAX);
        if record.window_start < now.saturating_sub(window) {
            return (RateDecision::Allowed, Some(fresh()));
        }

        if record.request_count < max_requests {
            let next = RateLimitRecord {
                request_count: record.request_count.saturating_add(1),
                ..record.clone()
            };
            return (RateDecision::Allowed, Some(next));
        }

        let window_end = record.window_start.saturating_add(window);
        let retry_after_secs = u64::try_from(window_end.saturating_sub(now)).unwrap_or(0);
        (RateDecision::Denied { retry_after_secs }, None)
    }
}

/// Read-only aggregate for operational visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    pub total_secrets: u64,
    pub active_secrets: u64,
    pub expired_secrets: u64,
    /// Rate-limit records whose window started within the retention period.
    pub rate_limit_records: u64,
    pub last_cleanup_at: Option<i64>,
}

/// Result of a combined secret + rate-limit sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub secrets_deleted: u64,
    pub rate_limits_deleted: u64,
    pub timestamp: i64,
}
