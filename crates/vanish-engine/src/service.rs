// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lifecycle orchestrator.

use std::net::IpAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tracing::{debug, info, warn};
use vanish_core::{
    CleanupReport, Clock, HealthStatus, RateDecision, RateLimitRecord, RateLimitStore,
    SecretRecord, SecretStore, StorageAdapter, StoreStatistics, VanishError,
};
use vanish_crypto::{is_valid_token, CryptoEngine, CIPHER_METHOD};
use vanish_ratelimit::{IdentityHasher, RateLimiter};
use zeroize::Zeroizing;

use crate::settings::{EngineSettings, SettingsUpdate};

/// Result of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedSecret {
    pub token: String,
    pub url: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    pub expires_at: i64,
}

/// Result of a successful retrieve. The plaintext is zeroed on drop.
pub struct RetrievedSecret {
    pub plaintext: Zeroizing<String>,
    pub created_at: i64,
    pub expires_at: i64,
    pub time_remaining: u64,
}

impl std::fmt::Debug for RetrievedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievedSecret")
            .field("plaintext", &"[redacted]")
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("time_remaining", &self.time_remaining)
            .finish()
    }
}

/// Cipher details for the admin settings view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionInfo {
    pub method: &'static str,
    pub key_configured: bool,
}

/// Settings and the crypto engine keyed by them, swapped together.
struct Runtime {
    settings: EngineSettings,
    crypto: CryptoEngine,
}

impl Runtime {
    fn new(settings: EngineSettings) -> Self {
        let crypto = CryptoEngine::new(settings.encryption_key.as_deref().map(String::as_str));
        Self { settings, crypto }
    }
}

fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}

/// Create, retrieve and maintain secrets.
pub struct SecretService {
    storage: Arc<dyn StorageAdapter>,
    secrets: Arc<dyn SecretStore>,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    runtime: ArcSwap<Runtime>,
}

impl SecretService {
    /// Wire the service over an initialized storage backend.
    pub fn new<S: StorageAdapter>(
        storage: Arc<S>,
        hasher: IdentityHasher,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        let limits: Arc<dyn RateLimitStore> = storage.clone();
        let secrets: Arc<dyn SecretStore> = storage.clone();
        Self {
            storage,
            secrets,
            limiter: RateLimiter::new(limits, hasher, Arc::clone(&clock)),
            clock,
            runtime: ArcSwap::from_pointee(Runtime::new(settings)),
        }
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> EngineSettings {
        self.runtime.load().settings.clone()
    }

    /// Validate and apply a partial settings change; returns the new settings.
    ///
    /// A changed key makes every stored secret undecryptable.
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<EngineSettings, VanishError> {
        update.validate()?;
        self.runtime
            .rcu(|current| Runtime::new(current.settings.apply(update)));
        if update.changes_key() {
            warn!("encryption key replaced; existing secrets can no longer be decrypted");
        }
        info!(?update, "engine settings updated");
        Ok(self.settings())
    }

    pub fn encryption_info(&self) -> EncryptionInfo {
        EncryptionInfo {
            method: CIPHER_METHOD,
            key_configured: self.runtime.load().crypto.is_configured(),
        }
    }

    /// Store a new secret for `client`.
    ///
    /// Order: rate check, size check, emptiness check, encrypt, persist. A
    /// rejected payload still counts against the client's window.
    pub async fn create(&self, plaintext: &str, client: &IpAddr) -> Result<CreatedSecret, VanishError> {
        let runtime = self.runtime.load_full();
        let settings = &runtime.settings;

        if let RateDecision::Denied { retry_after_secs } =
            self.limiter.check(client, &settings.rate_limit).await?
        {
            return Err(VanishError::RateLimited { retry_after_secs });
        }

        if plaintext.chars().count() > settings.max_secret_chars {
            return Err(VanishError::PayloadTooLarge {
                max_chars: settings.max_secret_chars,
            });
        }
        if plaintext.is_empty() {
            return Err(VanishError::EmptyPayload);
        }

        let sealed = runtime.crypto.encrypt(plaintext.as_bytes()).inspect_err(|e| {
            warn!(error = %e, "secret encryption failed");
        })?;

        let now = self.clock.now();
        let expires_at = now.saturating_add(i64::try_from(settings.ttl_secs).unwrap_or(i64::MAX));
        let record = SecretRecord {
            token: sealed.token,
            ciphertext: sealed.ciphertext,
            iv: sealed.iv,
            created_at: now,
            expires_at,
        };
        self.secrets.put(&record).await?;
        debug!(token = token_prefix(&record.token), expires_at, "secret stored");

        if settings.sweep_on_write {
            match self.secrets.cleanup_expired(now).await {
                Ok(swept) if settings.debug && swept > 0 => {
                    info!(swept, "opportunistic sweep removed expired secrets");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "opportunistic sweep failed"),
            }
        }

        Ok(CreatedSecret {
            url: settings.secret_url(&record.token),
            token: record.token,
            expires_in: settings.ttl_secs,
            expires_at,
        })
    }

    /// Decrypt a live secret. Reading does not consume it.
    ///
    /// Unknown and expired tokens both yield [`VanishError::NotFound`].
    pub async fn retrieve(&self, token: &str) -> Result<RetrievedSecret, VanishError> {
        if !is_valid_token(token) {
            return Err(VanishError::InvalidToken);
        }
        let token = token.to_ascii_lowercase();
        let now = self.clock.now();

        let record = self
            .secrets
            .get(&token, now)
            .await?
            .ok_or(VanishError::NotFound)?;

        let runtime = self.runtime.load();
        let opened = runtime
            .crypto
            .decrypt(&record.ciphertext, &record.iv)
            .and_then(|bytes| {
                String::from_utf8(bytes.to_vec())
                    .map(Zeroizing::new)
                    .map_err(|_| VanishError::Decryption("plaintext is not valid UTF-8".to_string()))
            });

        let plaintext = match opened {
            Ok(p) => p,
            Err(e) => {
                if runtime.settings.debug {
                    warn!(token = token_prefix(&token), error = %e, "secret decryption failed");
                } else {
                    warn!("secret decryption failed");
                }
                return Err(e);
            }
        };

        Ok(RetrievedSecret {
            plaintext,
            created_at: record.created_at,
            expires_at: record.expires_at,
            time_remaining: record.time_remaining(now),
        })
    }

    /// Remove a secret before its expiry. Returns whether a record was deleted.
    pub async fn delete(&self, token: &str) -> Result<bool, VanishError> {
        if !is_valid_token(token) {
            return Err(VanishError::InvalidToken);
        }
        let token = token.to_ascii_lowercase();
        let deleted = self.secrets.delete(&token).await?;
        if deleted {
            info!(token = token_prefix(&token), "secret deleted");
        }
        Ok(deleted)
    }

    /// Sweep expired secrets and stale rate-limit records.
    pub async fn cleanup(&self) -> Result<CleanupReport, VanishError> {
        let now = self.clock.now();
        let secrets_deleted = self.secrets.cleanup_expired(now).await?;
        let rate_limits_deleted = self.limiter.cleanup().await?;

        let report = CleanupReport {
            secrets_deleted,
            rate_limits_deleted,
            timestamp: now,
        };
        if self.runtime.load().settings.debug {
            info!(secrets_deleted, rate_limits_deleted, "cleanup complete");
        } else {
            debug!(secrets_deleted, rate_limits_deleted, "cleanup complete");
        }
        Ok(report)
    }

    pub async fn statistics(&self) -> Result<StoreStatistics, VanishError> {
        self.secrets.statistics(self.clock.now()).await
    }

    pub async fn clear_rate_limits(&self) -> Result<bool, VanishError> {
        self.limiter.clear_all().await
    }

    pub async fn list_rate_limits(&self, limit: usize) -> Result<Vec<RateLimitRecord>, VanishError> {
        self.limiter.list(limit).await
    }

    pub async fn health(&self) -> Result<HealthStatus, VanishError> {
        self.storage.health_check().await
    }

    /// Flush storage before exit.
    pub async fn shutdown(&self) -> Result<(), VanishError> {
        self.storage.close().await
    }
}
