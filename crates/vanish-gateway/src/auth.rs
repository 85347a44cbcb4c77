// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication for admin routes.
//!
//! When no admin token is configured, all admin requests are rejected
//! (fail-closed).

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

/// Admin authentication configuration.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected bearer token. `None` disables admin access entirely.
    pub admin_token: Option<Arc<str>>,
}

impl AuthConfig {
    pub fn new(admin_token: Option<&str>) -> Self {
        Self {
            admin_token: admin_token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_token", &self.admin_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Equality that does not short-circuit on the first differing byte.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Middleware that checks `Authorization: Bearer <token>`.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = auth.admin_token.as_deref() else {
        tracing::error!("admin token not configured, rejecting admin request");
        return Err(ApiError::Unauthorized);
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let authorized =
        matches!(presented, Some(token) if tokens_match(token.as_bytes(), expected.as_bytes()));
    if !authorized {
        tracing::debug!(path = %request.uri().path(), "admin request rejected");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
