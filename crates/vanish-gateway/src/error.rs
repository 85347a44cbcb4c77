// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of engine errors onto HTTP responses.
//!
//! Every error body has the shape `{"success": false, "code": ..., "message": ...}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vanish_core::VanishError;

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
}

/// An error returned from a gateway handler.
#[derive(Debug)]
pub enum ApiError {
    /// An engine error, mapped by kind.
    Engine(VanishError),
    /// Malformed request body or parameters.
    BadRequest {
        code: &'static str,
        message: String,
    },
    /// Missing or wrong admin credentials.
    Unauthorized,
}

impl From<VanishError> for ApiError {
    fn from(e: VanishError) -> Self {
        Self::Engine(e)
    }
}

/// HTTP status for an engine error.
pub fn status_for(e: &VanishError) -> StatusCode {
    match e {
        VanishError::EmptyPayload | VanishError::PayloadTooLarge { .. } | VanishError::InvalidToken => {
            StatusCode::BAD_REQUEST
        }
        VanishError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        VanishError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Engine(e) => {
                let status = status_for(&e);
                if status.is_server_error() {
                    tracing::error!(code = e.code(), error = %e, "request failed");
                }
                let body = ErrorBody {
                    success: false,
                    code: e.code(),
                    message: e.public_message(),
                };
                let mut response = (status, Json(body)).into_response();
                if let VanishError::RateLimited { retry_after_secs } = e {
                    response
                        .headers_mut()
                        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                }
                response
            }
            Self::BadRequest { code, message } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    success: false,
                    code,
                    message,
                }),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    success: false,
                    code: "unauthorized",
                    message: "Authentication required".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
