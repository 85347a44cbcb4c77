// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end engine tests.
//!
//! `TestHarness` assembles a [`SecretService`] over a temp SQLite database
//! with a [`ManualClock`], so expiry can be exercised without sleeping.

use std::sync::Arc;

use vanish_config::VanishConfig;
use vanish_core::{StorageAdapter, VanishError};
use vanish_engine::{EngineSettings, SecretService};
use vanish_ratelimit::IdentityHasher;
use vanish_storage::SqliteStorage;

use crate::clock::ManualClock;

/// Valid 64-hex key used by default.
pub const TEST_KEY: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

/// Default starting time: 2025-01-01 00:00:00 UTC.
const DEFAULT_START: i64 = 1_735_689_600;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    config: VanishConfig,
    clock: Option<Arc<ManualClock>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = VanishConfig::default();
        config.encryption.key = Some(TEST_KEY.to_string());
        config.server.public_url = "http://vanish.test".to_string();
        config.rate_limit.identity_salt = Some("harness-salt".to_string());
        Self {
            config,
            clock: None,
        }
    }

    /// Share a clock with the test.
    pub fn with_clock(mut self, clock: Arc<ManualClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_ttl_secs(mut self, ttl: u64) -> Self {
        self.config.secrets.ttl_secs = ttl;
        self
    }

    /// Replace the encryption key; `None` leaves the engine unkeyed.
    pub fn with_key(mut self, key: Option<&str>) -> Self {
        self.config.encryption.key = key.map(str::to_string);
        self
    }

    /// Arbitrary config changes.
    pub fn with_config(mut self, tweak: impl FnOnce(&mut VanishConfig)) -> Self {
        tweak(&mut self.config);
        self
    }

    /// Open the database and wire the service.
    pub async fn build(self) -> Result<TestHarness, VanishError> {
        let temp_dir = tempfile::TempDir::new().map_err(VanishError::storage)?;
        let mut config = self.config;
        config.storage.database_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .into_owned();

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(ManualClock::new(DEFAULT_START)));
        let hasher = IdentityHasher::new(config.rate_limit.identity_salt.as_deref())?;
        let service = Arc::new(SecretService::new(
            Arc::clone(&storage),
            hasher,
            clock.clone(),
            EngineSettings::from_config(&config),
        ));

        Ok(TestHarness {
            service,
            storage,
            clock,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A wired engine over a throwaway database. The database is deleted when
/// the harness is dropped.
pub struct TestHarness {
    pub service: Arc<SecretService>,
    pub storage: Arc<SqliteStorage>,
    pub clock: Arc<ManualClock>,
    pub config: VanishConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }
}
