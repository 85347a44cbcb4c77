// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyed crypto engine used by the lifecycle orchestrator.

use ring::rand::SystemRandom;
use tracing::debug;
use vanish_core::VanishError;
use zeroize::Zeroizing;

use crate::{cipher, kdf, token};

/// Human-readable name of the cipher, reported by the admin settings view.
pub const CIPHER_METHOD: &str = "AES-256-GCM";

/// Output of [`CryptoEngine::encrypt`].
pub struct SealedSecret {
    pub token: String,
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
}

impl std::fmt::Debug for SealedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedSecret")
            .field("token", &self.token)
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

/// Holds the derived cipher key (if any) and the system RNG.
///
/// The derived key is zeroed on drop.
#[derive(Clone)]
pub struct CryptoEngine {
    key: Option<Zeroizing<[u8; 32]>>,
    rng: SystemRandom,
}

impl CryptoEngine {
    /// Build an engine from configured key material. `None` or an empty
    /// string yields an engine that fails every call with
    /// [`VanishError::KeyNotConfigured`].
    pub fn new(key_material: Option<&str>) -> Self {
        let key = key_material
            .filter(|m| !m.is_empty())
            .map(|m| kdf::derive_key(m.as_bytes()));
        if key.is_some() {
            debug!(method = CIPHER_METHOD, "encryption key loaded");
        } else {
            debug!("no encryption key configured");
        }
        Self {
            key,
            rng: SystemRandom::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    fn key(&self) -> Result<&[u8; 32], VanishError> {
        self.key.as_deref().ok_or(VanishError::KeyNotConfigured)
    }

    /// Seal `plaintext` and mint a token for it.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<SealedSecret, VanishError> {
        let key = self.key()?;
        let (ciphertext, iv) = cipher::seal(&self.rng, key, plaintext)?;
        let token = token::generate_token(&self.rng)?;
        Ok(SealedSecret {
            token,
            ciphertext,
            iv: iv.to_vec(),
        })
    }

    /// Open a ciphertext sealed under the same key material.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Zeroizing<Vec<u8>>, VanishError> {
        let key = self.key()?;
        cipher::open(key, iv, ciphertext).map(Zeroizing::new)
    }
}

impl std::fmt::Debug for CryptoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoEngine")
            .field("method", &CIPHER_METHOD)
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    const MATERIAL: &str = "6f1c2a9e4b7d8035c1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4";

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let engine = CryptoEngine::new(Some(MATERIAL));
        let sealed = engine.encrypt(b"hello").unwrap();
        assert_eq!(sealed.iv.len(), cipher::IV_LEN);
        assert!(token::is_valid_token(&sealed.token));
        let plain = engine.decrypt(&sealed.ciphertext, &sealed.iv).unwrap();
        assert_eq!(plain.as_slice(), b"hello");
    }

    #[test]
    fn missing_key_fails_both_ways() {
        for engine in [CryptoEngine::new(None), CryptoEngine::new(Some(""))] {
            assert!(!engine.is_configured());
            assert!(matches!(
                engine.encrypt(b"x").unwrap_err(),
                VanishError::KeyNotConfigured
            ));
            assert!(matches!(
                engine.decrypt(b"x", &[0u8; 12]).unwrap_err(),
                VanishError::KeyNotConfigured
            ));
        }
    }

    #[test]
    fn rotated_key_cannot_decrypt_old_secret() {
        let old = CryptoEngine::new(Some(MATERIAL));
        let sealed = old.encrypt(b"before rotation").unwrap();
        let new = CryptoEngine::new(Some("a different key"));
        assert!(matches!(
            new.decrypt(&sealed.ciphertext, &sealed.iv).unwrap_err(),
            VanishError::Decryption(_)
        ));
    }

    #[test]
    fn debug_does_not_expose_key() {
        let debug = format!("{:?}", CryptoEngine::new(Some(MATERIAL)));
        assert!(!debug.contains(MATERIAL));
        assert!(debug.contains("configured: true"));
    }

    #[test]
    #[traced_test]
    fn construction_logs_key_state_without_material() {
        let _ = CryptoEngine::new(Some(MATERIAL));
        assert!(logs_contain("encryption key loaded"));
        assert!(!logs_contain(MATERIAL));

        let _ = CryptoEngine::new(None);
        assert!(logs_contain("no encryption key configured"));
    }
}
