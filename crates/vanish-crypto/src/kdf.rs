// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key derivation from operator key material.
//!
//! The configured key is a human-manageable string (normally 64 hex chars).
//! It is hashed with SHA-256 so the cipher always receives exactly 32 bytes.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Derive the 32-byte cipher key from configured key material.
///
/// The material is hashed as-is; it is not hex-decoded first.
pub fn derive_key(material: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&Sha256::digest(material));
    key
}
