// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vanish secret lifecycle engine.

use thiserror::Error;

/// The primary error type used across all Vanish adapter traits and engine operations.
#[derive(Debug, Error)]
pub enum VanishError {
    /// The submitted secret was empty.
    #[error("secret cannot be empty")]
    EmptyPayload,

    /// The submitted secret exceeds the configured character limit.
    #[error("secret exceeds maximum size of {max_chars} characters")]
    PayloadTooLarge { max_chars: usize },

    /// A token did not match the 32-character hex format.
    #[error("invalid token format")]
    InvalidToken,

    /// The client exhausted its request budget for the current window.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// No live secret exists for the token (never issued, expired, or swept).
    #[error("secret not found or expired")]
    NotFound,

    /// No encryption key is configured.
    #[error("encryption key is not configured")]
    KeyNotConfigured,

    /// The cipher failed while sealing a payload.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The cipher failed while opening a payload (wrong key, corruption).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Storage backend errors (database connection, query failure, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid values supplied at runtime).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VanishError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPayload => "empty_secret",
            Self::PayloadTooLarge { .. } => "secret_too_large",
            Self::InvalidToken => "invalid_token",
            Self::RateLimited { .. } => "rate_limit_exceeded",
            Self::NotFound => "secret_not_found",
            Self::KeyNotConfigured => "no_encryption_key",
            Self::Encryption(_) => "encryption_failed",
            Self::Decryption(_) => "decryption_failed",
            Self::Storage { .. } => "db_error",
            Self::Config(_) => "config_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether the error was caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPayload
                | Self::PayloadTooLarge { .. }
                | Self::InvalidToken
                | Self::RateLimited { .. }
                | Self::NotFound
        )
    }

    /// Message that is safe to show to an end user.
    ///
    /// Server-side failures collapse to a generic sentence so cipher and
    /// database details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::RateLimited { retry_after_secs } => format!(
                "Rate limit exceeded. Please try again in {} minutes.",
                retry_after_secs.div_ceil(60)
            ),
            Self::KeyNotConfigured | Self::Encryption(_) | Self::Storage { .. } => {
                "Failed to create secret".to_string()
            }
            Self::Decryption(_) => "Failed to decrypt secret".to_string(),
            Self::Config(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => {
                let mut msg = other.to_string();
                if let Some(first) = msg.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                msg
            }
        }
    }

    /// Wrap any error as a storage error.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_message_rounds_minutes_up() {
        let err = VanishError::RateLimited {
            retry_after_secs: 61,
        };
        assert_eq!(
            err.public_message(),
            "Rate limit exceeded. Please try again in 2 minutes."
        );

        let exact = VanishError::RateLimited {
            retry_after_secs: 3600,
        };
        assert!(exact.public_message().contains("in 60 minutes"));
    }

    #[test]
    fn server_errors_hide_details() {
        let err = VanishError::Decryption("aead::Error at block 3".into());
        assert_eq!(err.public_message(), "Failed to decrypt secret");
        assert!(!err.is_client_error());

        let err = VanishError::storage(std::io::Error::other("disk on fire"));
        assert!(!err.public_message().contains("disk"));
    }

    #[test]
    fn validation_errors_are_client_errors() {
        assert!(VanishError::EmptyPayload.is_client_error());
        assert!(VanishError::InvalidToken.is_client_error());
        assert!(VanishError::NotFound.is_client_error());
        assert_eq!(
            VanishError::PayloadTooLarge { max_chars: 10 }.public_message(),
            "Secret exceeds maximum size of 10 characters"
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(VanishError::NotFound.code(), "secret_not_found");
        assert_eq!(VanishError::KeyNotConfigured.code(), "no_encryption_key");
        assert_eq!(
            VanishError::RateLimited {
                retry_after_secs: 1
            }
            .code(),
            "rate_limit_exceeded"
        );
    }
}
