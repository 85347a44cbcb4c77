// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-client rate limiting for secret creation.
//!
//! Clients are identified by a salted SHA-256 of their address; raw
//! addresses are never persisted. Counting uses a fixed window: the first
//! request opens a window, later requests inside it increment the counter,
//! and the first request after it closes starts a new one.

pub mod identity;
pub mod limiter;

pub use identity::{resolve_client_ip, IdentityHasher, PROXY_HEADERS};
pub use limiter::{RateLimitPolicy, RateLimiter};
