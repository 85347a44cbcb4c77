// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token and key generation.

use std::sync::LazyLock;

use regex::Regex;
use ring::rand::{SecureRandom, SystemRandom};
use vanish_core::VanishError;

/// Random bytes per token (hex-encoded to 32 chars).
pub const TOKEN_BYTES: usize = 16;

/// Random bytes per generated key (hex-encoded to 64 chars).
pub const KEY_BYTES: usize = 32;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-f0-9]{32}$").expect("token regex is valid"));

fn random_hex<const N: usize>(rng: &SystemRandom) -> Result<String, VanishError> {
    let mut bytes = [0u8; N];
    rng.fill(&mut bytes).map_err(|_| {
        tracing::error!("system RNG failed to produce random bytes");
        VanishError::Encryption("system RNG failure".to_string())
    })?;
    Ok(hex::encode(bytes))
}

/// A fresh 32-character lowercase hex token.
pub fn generate_token(rng: &SystemRandom) -> Result<String, VanishError> {
    random_hex::<TOKEN_BYTES>(rng)
}

/// A fresh 64-character hex key for operator key rotation.
pub fn generate_key() -> Result<String, VanishError> {
    random_hex::<KEY_BYTES>(&SystemRandom::new())
}

/// Whether `s` is exactly 32 hex characters, case-insensitive.
pub fn is_valid_token(s: &str) -> bool {
    TOKEN_RE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_is_valid_lowercase_hex() {
        let rng = SystemRandom::new();
        let token = generate_token(&rng).unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert!(is_valid_token(&token));
    }

    #[test]
    fn tokens_are_unique() {
        let rng = SystemRandom::new();
        assert_ne!(generate_token(&rng).unwrap(), generate_token(&rng).unwrap());
    }

    #[test]
    fn generated_key_is_64_hex() {
        let key = generate_key().unwrap();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn uppercase_tokens_are_accepted() {
        assert!(is_valid_token("0123456789ABCDEF0123456789abcdef"));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(!is_valid_token(""));
        assert!(!is_valid_token(&"a".repeat(31)));
        assert!(!is_valid_token(&"a".repeat(33)));
        assert!(!is_valid_token("g123456789abcdef0123456789abcdef"));
        assert!(!is_valid_token("0123456789abcdef0123456789abcde\n"));
        assert!(!is_valid_token("' OR 1=1 --aaaaaaaaaaaaaaaaaaaaa"));
    }
}
