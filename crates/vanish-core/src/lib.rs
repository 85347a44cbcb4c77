// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vanish secret-sharing engine.
//!
//! Provides the error type, domain records, the clock abstraction, and the
//! storage traits every other crate in the workspace builds on.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::VanishError;
pub use types::{
    AdapterType, CleanupReport, HealthStatus, RateDecision, RateLimitRecord, SecretRecord,
    StoreStatistics, RATE_LIMIT_RETENTION_SECS,
};

pub use traits::{PluginAdapter, RateLimitStore, SecretStore, StorageAdapter};
