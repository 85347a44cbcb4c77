// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use vanish_config::model::ServerConfig;
use vanish_core::VanishError;
use vanish_engine::SecretService;

use crate::admin;
use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub service: Arc<SecretService>,
    /// Admin authentication configuration.
    pub auth: AuthConfig,
    /// Honor proxy headers when resolving the client address.
    pub trust_proxy_headers: bool,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(service: Arc<SecretService>, config: &ServerConfig) -> Self {
        Self {
            service,
            auth: AuthConfig::new(config.admin_token.as_deref()),
            trust_proxy_headers: config.trust_proxy_headers,
            start_time: Instant::now(),
        }
    }
}

/// Build the full router:
/// - GET /health, POST /create, GET /retrieve/{token} (public)
/// - /admin/* (bearer auth)
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/create", post(handlers::post_create))
        .route("/retrieve/{token}", get(handlers::get_retrieve))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin/statistics", get(admin::get_statistics))
        .route("/admin/cleanup", post(admin::post_cleanup))
        .route("/admin/secrets/{token}", delete(admin::delete_secret))
        .route(
            "/admin/rate-limits",
            get(admin::get_rate_limits).delete(admin::delete_rate_limits),
        )
        .route(
            "/admin/settings",
            get(admin::get_settings).put(admin::put_settings),
        )
        .route("/admin/generate-key", post(admin::post_generate_key))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), VanishError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VanishError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(cancel.cancelled_owned())
    .await
    .map_err(|e| VanishError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
