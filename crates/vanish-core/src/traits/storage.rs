// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for secrets and rate-limit counters.

use async_trait::async_trait;

use crate::error::VanishError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{RateDecision, RateLimitRecord, SecretRecord, StoreStatistics};

/// Durable mapping token -> ciphertext with expiry.
///
/// Implementations must make each operation atomic per token: `put` is a
/// single insert guarded by a uniqueness constraint and `get` is a single
/// expiry-filtered read.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Insert a new record. Fails with [`VanishError::Storage`] if the token
    /// already exists; existing records are never overwritten.
    async fn put(&self, record: &SecretRecord) -> Result<(), VanishError>;

    /// Fetch a record only if `expires_at > now`.
    async fn get(&self, token: &str, now: i64) -> Result<Option<SecretRecord>, VanishError>;

    /// Remove a record. Returns whether a row was deleted.
    async fn delete(&self, token: &str) -> Result<bool, VanishError>;

    /// Delete every record with `expires_at <= now` and stamp the last-cleanup time.
    async fn cleanup_expired(&self, now: i64) -> Result<u64, VanishError>;

    /// Aggregate counts as of `now`.
    async fn statistics(&self, now: i64) -> Result<StoreStatistics, VanishError>;
}

/// Persistence for fixed-window rate-limit counters.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Atomically evaluate and record one request for `identity_hash`.
    ///
    /// The read-evaluate-write sequence must be serialized per identity so two
    /// concurrent requests cannot both pass the `count < max` test.
    async fn check_and_record(
        &self,
        identity_hash: &str,
        now: i64,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<RateDecision, VanishError>;

    /// Delete records whose window started before `now - retention_secs`.
    async fn cleanup_rate_limits(&self, now: i64, retention_secs: u64) -> Result<u64, VanishError>;

    /// Delete every rate-limit record.
    async fn clear_rate_limits(&self) -> Result<bool, VanishError>;

    /// Most recent records, newest window first.
    async fn list_rate_limits(&self, limit: usize) -> Result<Vec<RateLimitRecord>, VanishError>;
}

/// A storage backend that holds both secrets and rate-limit counters.
#[async_trait]
pub trait StorageAdapter: PluginAdapter + SecretStore + RateLimitStore {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), VanishError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), VanishError>;
}
