// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret lifecycle orchestration.
//!
//! [`SecretService`] composes the rate limiter, the crypto engine and the
//! secret store into the create / retrieve / cleanup operations, enforcing
//! the order rate check, size check, encrypt, persist.

pub mod service;
pub mod settings;

pub use service::{CreatedSecret, EncryptionInfo, RetrievedSecret, SecretService};
pub use settings::{EngineSettings, SettingsUpdate, SettingsView};
