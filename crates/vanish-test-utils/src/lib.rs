// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vanish integration tests.
//!
//! - [`ManualClock`] - a clock that only moves when told to
//! - [`TestHarness`] - a [`SecretService`](vanish_engine::SecretService) over a temp SQLite database

pub mod clock;
pub mod harness;

pub use clock::ManualClock;
pub use harness::{TestHarness, TestHarnessBuilder, TEST_KEY};
