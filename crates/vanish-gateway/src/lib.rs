// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Vanish.
//!
//! Public routes:
//! - `POST /create` stores a secret and returns its share link
//! - `GET /retrieve/{token}` decrypts a live secret
//! - `GET /health`
//!
//! Admin routes under `/admin` require `Authorization: Bearer <admin_token>`
//! and reject every request when no token is configured.

pub mod admin;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
