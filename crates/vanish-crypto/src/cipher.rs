// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open.
//!
//! Each [`seal`] draws a fresh 96-bit IV from the system CSPRNG. The 16-byte
//! authentication tag is appended to the ciphertext.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use vanish_core::VanishError;

/// IV length in bytes.
pub const IV_LEN: usize = NONCE_LEN;

fn gcm_key(key: &[u8; 32]) -> Option<LessSafeKey> {
    UnboundKey::new(&AES_256_GCM, key).ok().map(LessSafeKey::new)
}

/// Encrypt `plaintext`, returning `(ciphertext_with_tag, iv)`.
pub fn seal(
    rng: &SystemRandom,
    key: &[u8; 32],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; IV_LEN]), VanishError> {
    let key = gcm_key(key)
        .ok_or_else(|| VanishError::Encryption("invalid AES-256-GCM key".to_string()))?;

    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv).map_err(|_| {
        tracing::error!("system RNG failed to produce an IV");
        VanishError::Encryption("failed to generate random IV".to_string())
    })?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(iv), Aad::empty(), &mut in_out)
        .map_err(|_| VanishError::Encryption("AES-256-GCM seal failed".to_string()))?;

    Ok((in_out, iv))
}

/// Decrypt a ciphertext produced by [`seal`].
///
/// Fails on a wrong key, a malformed IV, or any modification of the
/// ciphertext or tag.
pub fn open(key: &[u8; 32], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, VanishError> {
    let key = gcm_key(key)
        .ok_or_else(|| VanishError::Decryption("invalid AES-256-GCM key".to_string()))?;
    let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| {
        VanishError::Decryption(format!("IV must be {IV_LEN} bytes, got {}", iv.len()))
    })?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(Nonce::assume_unique_for_key(iv), Aad::empty(), &mut in_out)
        .map_err(|_| {
            VanishError::Decryption("authentication failed: wrong key or corrupted data".to_string())
        })?;

    Ok(plaintext.to_vec())
}
