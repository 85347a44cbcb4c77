// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public HTTP handlers: create, retrieve and health.

use std::net::{IpAddr, SocketAddr};

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, Extensions, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use vanish_core::clock::format_timestamp;
use vanish_core::HealthStatus;
use vanish_ratelimit::resolve_client_ip;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for `POST /create`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    /// The plaintext to share.
    pub secret: String,
}

/// Response body for `POST /create`.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    pub token: String,
    /// Share link the recipient opens.
    pub url: String,
    /// Seconds until the secret expires.
    pub expires_in: u64,
}

/// Response body for `GET /retrieve/{token}`.
#[derive(Serialize)]
pub struct RetrieveResponse {
    pub success: bool,
    pub secret: String,
    pub created_at: String,
    pub expires_at: String,
    /// Seconds until the secret expires.
    pub time_remaining: u64,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    /// Detail when storage is not healthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Resolve the client address from the socket peer and, when trusted, proxy headers.
fn client_ip(state: &GatewayState, headers: &HeaderMap, extensions: &Extensions) -> IpAddr {
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    resolve_client_ip(
        |name| headers.get(name).and_then(|v| v.to_str().ok()),
        peer,
        state.trust_proxy_headers,
    )
}

/// POST /create
pub async fn post_create(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    extensions: Extensions,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest {
        code: "invalid_request",
        message: e.body_text(),
    })?;

    let client = client_ip(&state, &headers, &extensions);
    let created = state.service.create(&request.secret, &client).await?;

    let body = CreateResponse {
        success: true,
        token: created.token,
        url: created.url,
        expires_in: created.expires_in,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// GET /retrieve/{token}
pub async fn get_retrieve(
    State(state): State<GatewayState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let retrieved = state.service.retrieve(&token).await?;

    let body = RetrieveResponse {
        success: true,
        secret: retrieved.plaintext.as_str().to_owned(),
        created_at: format_timestamp(retrieved.created_at),
        expires_at: format_timestamp(retrieved.expires_at),
        time_remaining: retrieved.time_remaining,
    };
    let mut response = Json(body).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let health = match state.service.health().await {
        Ok(h) => h,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    };

    let (status_code, status, detail) = match health {
        HealthStatus::Healthy => (StatusCode::OK, "healthy", None),
        HealthStatus::Degraded(d) => (StatusCode::OK, "degraded", Some(d)),
        HealthStatus::Unhealthy(d) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(d)),
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
        detail,
    };
    (status_code, Json(body)).into_response()
}
