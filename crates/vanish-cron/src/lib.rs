// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic cleanup of expired secrets and stale rate-limit records.
//!
//! The sweeper runs independently of request handling. Failures are logged
//! and retried on the next tick; they never stop the loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vanish_core::{AdapterType, CleanupReport, HealthStatus, PluginAdapter, VanishError};
use vanish_engine::SecretService;

/// Outcome of the most recent sweep.
#[derive(Debug, Clone)]
enum LastRun {
    Never,
    Ok(CleanupReport),
    Failed(String),
}

/// Interval-driven sweeper over a [`SecretService`].
pub struct Sweeper {
    service: Arc<SecretService>,
    interval: Duration,
    last: Mutex<LastRun>,
}

impl Sweeper {
    pub fn new(service: Arc<SecretService>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            last: Mutex::new(LastRun::Never),
        }
    }

    /// Run one sweep and remember its outcome.
    pub async fn run_once(&self) -> Result<CleanupReport, VanishError> {
        let result = self.service.cleanup().await;
        let last = match &result {
            Ok(report) => LastRun::Ok(*report),
            Err(e) => LastRun::Failed(e.to_string()),
        };
        if let Ok(mut guard) = self.last.lock() {
            *guard = last;
        }
        result
    }

    /// Report of the last successful sweep, if the last sweep succeeded.
    pub fn last_report(&self) -> Option<CleanupReport> {
        match self.last.lock().ok()?.clone() {
            LastRun::Ok(report) => Some(report),
            _ => None,
        }
    }

    /// Sweep every `interval` until `cancel` fires. The first sweep happens
    /// one interval after start.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // Skip the first immediate tick.
        interval.tick().await;

        info!(interval_secs = self.interval.as_secs(), "expiry sweeper started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_once().await {
                        Ok(report) => debug!(
                            secrets_deleted = report.secrets_deleted,
                            rate_limits_deleted = report.rate_limits_deleted,
                            "scheduled sweep finished"
                        ),
                        Err(e) => warn!(error = %e, "scheduled sweep failed (non-fatal)"),
                    }
                }
                _ = cancel.cancelled() => {
                    info!("expiry sweeper shutting down");
                    break;
                }
            }
        }
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}

#[async_trait]
impl PluginAdapter for Sweeper {
    fn name(&self) -> &str {
        "expiry-sweeper"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Scheduler
    }

    async fn health_check(&self) -> Result<HealthStatus, VanishError> {
        let last = self
            .last
            .lock()
            .map_err(|_| VanishError::Internal("sweeper state poisoned".to_string()))?
            .clone();
        Ok(match last {
            LastRun::Failed(e) => HealthStatus::Degraded(format!("last sweep failed: {e}")),
            LastRun::Never | LastRun::Ok(_) => HealthStatus::Healthy,
        })
    }

    async fn shutdown(&self) -> Result<(), VanishError> {
        Ok(())
    }
}
