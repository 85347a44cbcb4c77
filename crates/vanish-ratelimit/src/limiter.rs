// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate limiter over a [`RateLimitStore`].

use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vanish_core::{Clock, RateDecision, RateLimitRecord, RateLimitStore, VanishError, RATE_LIMIT_RETENTION_SECS};

use crate::identity::IdentityHasher;

/// Limits applied to each check. Passed per call so runtime setting changes
/// take effect on the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Fixed-window limiter keyed by salted client address hash.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    hasher: IdentityHasher,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, hasher: IdentityHasher, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            hasher,
            clock,
        }
    }

    /// Count one request from `client` and decide whether it may proceed.
    ///
    /// A disabled policy allows everything without touching the store.
    pub async fn check(&self, client: &IpAddr, policy: &RateLimitPolicy) -> Result<RateDecision, VanishError> {
        if !policy.enabled {
            return Ok(RateDecision::Allowed);
        }

        let identity = self.hasher.hash(client);
        let decision = self
            .store
            .check_and_record(&identity, self.clock.now(), policy.max_requests, policy.window_secs)
            .await?;

        if let RateDecision::Denied { retry_after_secs } = decision {
            debug!(identity = &identity[..12], retry_after_secs, "rate limit exceeded");
        }
        Ok(decision)
    }

    /// Drop records whose window started more than seven days ago.
    pub async fn cleanup(&self) -> Result<u64, VanishError> {
        self.store
            .cleanup_rate_limits(self.clock.now(), RATE_LIMIT_RETENTION_SECS)
            .await
    }

    /// Forget every client.
    pub async fn clear_all(&self) -> Result<bool, VanishError> {
        let cleared = self.store.clear_rate_limits().await?;
        info!("all rate-limit records cleared");
        Ok(cleared)
    }

    /// Most recent records, newest window first.
    pub async fn list(&self, limit: usize) -> Result<Vec<RateLimitRecord>, VanishError> {
        self.store.list_rate_limits(limit).await
    }
}

#[cfg(test)]
mod tests {
    use vanish_config::model::StorageConfig;
    use vanish_storage::{Database, SqliteStorage};
    use vanish_test_utils::ManualClock;

    use super::*;

    const POLICY: RateLimitPolicy = RateLimitPolicy {
        enabled: true,
        max_requests: 3,
        window_secs: 3600,
    };

    async fn limiter(clock: Arc<ManualClock>) -> RateLimiter {
        let db = Database::open_in_memory().await.unwrap();
        let storage = SqliteStorage::from_database(StorageConfig::default(), db);
        RateLimiter::new(
            Arc::new(storage),
            IdentityHasher::new(Some("test-salt")).unwrap(),
            clock,
        )
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn fourth_request_in_window_is_denied() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = limiter(clock.clone()).await;
        let client = ip("192.0.2.10");

        for _ in 0..3 {
            assert!(limiter.check(&client, &POLICY).await.unwrap().is_allowed());
        }
        clock.advance(600);
        assert_eq!(
            limiter.check(&client, &POLICY).await.unwrap(),
            RateDecision::Denied { retry_after_secs: 3000 }
        );
    }

    #[tokio::test]
    async fn new_window_after_expiry_resets_to_one() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = limiter(clock.clone()).await;
        let client = ip("192.0.2.10");

        for _ in 0..4 {
            limiter.check(&client, &POLICY).await.unwrap();
        }
        clock.advance(3601);
        assert!(limiter.check(&client, &POLICY).await.unwrap().is_allowed());

        let records = limiter.list(50).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].request_count, 1);
        assert_eq!(records[0].window_start, 1_003_601);
    }

    #[tokio::test]
    async fn clients_are_counted_separately() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = limiter(clock).await;

        for _ in 0..3 {
            limiter.check(&ip("192.0.2.1"), &POLICY).await.unwrap();
        }
        assert!(limiter.check(&ip("192.0.2.2"), &POLICY).await.unwrap().is_allowed());
        assert!(!limiter.check(&ip("192.0.2.1"), &POLICY).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn disabled_policy_never_records() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = limiter(clock).await;
        let disabled = RateLimitPolicy {
            enabled: false,
            ..POLICY
        };

        for _ in 0..10 {
            assert!(limiter.check(&ip("192.0.2.1"), &disabled).await.unwrap().is_allowed());
        }
        assert!(limiter.list(50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn raw_addresses_are_never_stored() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = limiter(clock).await;
        limiter.check(&ip("198.51.100.77"), &POLICY).await.unwrap();

        let records = limiter.list(50).await.unwrap();
        assert_eq!(records[0].identity_hash.len(), 64);
        assert!(!records[0].identity_hash.contains("198.51.100.77"));
    }

    #[tokio::test]
    async fn cleanup_uses_fixed_retention() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let limiter = limiter(clock.clone()).await;
        limiter.check(&ip("192.0.2.1"), &POLICY).await.unwrap();

        clock.advance(RATE_LIMIT_RETENTION_SECS as i64);
        assert_eq!(limiter.cleanup().await.unwrap(), 0);
        clock.advance(1);
        assert_eq!(limiter.cleanup().await.unwrap(), 1);

        limiter.check(&ip("192.0.2.1"), &POLICY).await.unwrap();
        assert!(limiter.clear_all().await.unwrap());
        assert!(limiter.list(50).await.unwrap().is_empty());
    }
}
