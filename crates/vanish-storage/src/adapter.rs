// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use vanish_config::model::StorageConfig;
use vanish_core::{
    AdapterType, HealthStatus, PluginAdapter, RateDecision, RateLimitRecord, RateLimitStore,
    SecretRecord, SecretStore, StorageAdapter, StoreStatistics, VanishError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage for secrets and rate-limit counters.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// call fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage. No connection is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database.
    pub fn from_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    fn db(&self) -> Result<&Database, VanishError> {
        self.db.get().ok_or_else(|| VanishError::Storage {
            source: "storage not initialized, call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VanishError> {
        match self.db.get() {
            None => Ok(HealthStatus::Unhealthy("not initialized".to_string())),
            Some(db) => match db.ping().await {
                Ok(()) => Ok(HealthStatus::Healthy),
                Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
            },
        }
    }

    async fn shutdown(&self) -> Result<(), VanishError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SecretStore for SqliteStorage {
    async fn put(&self, record: &SecretRecord) -> Result<(), VanishError> {
        queries::secrets::insert_secret(self.db()?, record).await
    }

    async fn get(&self, token: &str, now: i64) -> Result<Option<SecretRecord>, VanishError> {
        queries::secrets::get_live_secret(self.db()?, token, now).await
    }

    async fn delete(&self, token: &str) -> Result<bool, VanishError> {
        queries::secrets::delete_secret(self.db()?, token).await
    }

    async fn cleanup_expired(&self, now: i64) -> Result<u64, VanishError> {
        queries::secrets::delete_expired(self.db()?, now).await
    }

    async fn statistics(&self, now: i64) -> Result<StoreStatistics, VanishError> {
        queries::secrets::statistics(self.db()?, now).await
    }
}

#[async_trait]
impl RateLimitStore for SqliteStorage {
    async fn check_and_record(
        &self,
        identity_hash: &str,
        now: i64,
        max_requests: u32,
        window_secs: u64,
    ) -> Result<RateDecision, VanishError> {
        queries::rate_limits::check_and_record(
            self.db()?,
            identity_hash,
            now,
            max_requests,
            window_secs,
        )
        .await
    }

    async fn cleanup_rate_limits(&self, now: i64, retention_secs: u64) -> Result<u64, VanishError> {
        queries::rate_limits::delete_stale(self.db()?, now, retention_secs).await
    }

    async fn clear_rate_limits(&self) -> Result<bool, VanishError> {
        let removed = queries::rate_limits::delete_all(self.db()?).await?;
        debug!(removed, "rate-limit records cleared");
        Ok(true)
    }

    async fn list_rate_limits(&self, limit: usize) -> Result<Vec<RateLimitRecord>, VanishError> {
        queries::rate_limits::list_recent(self.db()?, limit).await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), VanishError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VanishError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VanishError> {
        self.db()?.checkpoint().await
    }
}
