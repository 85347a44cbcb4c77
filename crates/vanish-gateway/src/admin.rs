// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin handlers. Mounted behind [`crate::auth::auth_middleware`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use vanish_core::clock::format_timestamp;
use vanish_core::{CleanupReport, RateLimitRecord, StoreStatistics, VanishError};
use vanish_engine::{EncryptionInfo, SettingsUpdate, SettingsView};

use crate::error::ApiError;
use crate::server::GatewayState;

const DEFAULT_RATE_LIMIT_LIST: usize = 50;
const MAX_RATE_LIMIT_LIST: usize = 1000;

/// Response body for `GET /admin/statistics`.
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    #[serde(flatten)]
    pub stats: StoreStatistics,
    /// `last_cleanup_at` formatted as UTC, or `"Never"`.
    pub last_cleanup: String,
}

/// Query for `GET /admin/rate-limits`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// Response body for `DELETE /admin/rate-limits`.
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// Response body for the settings endpoints.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: SettingsView,
    pub encryption: EncryptionInfo,
}

/// Response body for `DELETE /admin/secrets/{token}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Query for `POST /admin/generate-key`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateKeyQuery {
    /// Install the new key immediately.
    #[serde(default)]
    pub apply: bool,
}

/// Response body for `POST /admin/generate-key`.
#[derive(Debug, Serialize)]
pub struct GenerateKeyResponse {
    pub key: String,
    pub applied: bool,
}

/// GET /admin/statistics
pub async fn get_statistics(
    State(state): State<GatewayState>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let stats = state.service.statistics().await?;
    let last_cleanup = stats
        .last_cleanup_at
        .map(format_timestamp)
        .unwrap_or_else(|| "Never".to_string());
    Ok(Json(StatisticsResponse {
        stats,
        last_cleanup,
    }))
}

/// POST /admin/cleanup
pub async fn post_cleanup(
    State(state): State<GatewayState>,
) -> Result<Json<CleanupReport>, ApiError> {
    let report = state.service.cleanup().await?;
    tracing::info!(
        secrets_deleted = report.secrets_deleted,
        rate_limits_deleted = report.rate_limits_deleted,
        "manual cleanup"
    );
    Ok(Json(report))
}

/// DELETE /admin/secrets/{token}
pub async fn delete_secret(
    State(state): State<GatewayState>,
    Path(token): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.service.delete(&token).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// GET /admin/rate-limits
pub async fn get_rate_limits(
    State(state): State<GatewayState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RateLimitRecord>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RATE_LIMIT_LIST)
        .min(MAX_RATE_LIMIT_LIST);
    Ok(Json(state.service.list_rate_limits(limit).await?))
}

/// DELETE /admin/rate-limits
pub async fn delete_rate_limits(
    State(state): State<GatewayState>,
) -> Result<Json<ClearResponse>, ApiError> {
    let cleared = state.service.clear_rate_limits().await?;
    tracing::info!("rate limit records cleared");
    Ok(Json(ClearResponse { cleared }))
}

/// GET /admin/settings
pub async fn get_settings(State(state): State<GatewayState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        settings: state.service.settings().view(),
        encryption: state.service.encryption_info(),
    })
}

/// PUT /admin/settings
pub async fn put_settings(
    State(state): State<GatewayState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let Json(update) = payload.map_err(|e| ApiError::BadRequest {
        code: "invalid_request",
        message: e.body_text(),
    })?;

    let settings = state
        .service
        .update_settings(&update)
        .map_err(|e| match e {
            VanishError::Config(message) => ApiError::BadRequest {
                code: "invalid_settings",
                message,
            },
            other => ApiError::Engine(other),
        })?;

    Ok(Json(SettingsResponse {
        settings: settings.view(),
        encryption: state.service.encryption_info(),
    }))
}

/// POST /admin/generate-key
pub async fn post_generate_key(
    State(state): State<GatewayState>,
    Query(query): Query<GenerateKeyQuery>,
) -> Result<Json<GenerateKeyResponse>, ApiError> {
    let key = vanish_crypto::generate_key()?;
    if query.apply {
        let update = SettingsUpdate {
            encryption_key: Some(key.clone()),
            ..SettingsUpdate::default()
        };
        state.service.update_settings(&update)?;
    }
    Ok(Json(GenerateKeyResponse {
        key,
        applied: query.apply,
    }))
}
