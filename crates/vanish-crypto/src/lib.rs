// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Crypto engine for Vanish.
//!
//! Payloads are sealed with AES-256-GCM under a key derived from operator
//! key material. Every sealed payload gets a fresh random IV and a separate
//! random token, so tokens reveal nothing about the ciphertext and rotating
//! the key invalidates every stored secret at once.

pub mod cipher;
pub mod engine;
pub mod kdf;
pub mod token;

pub use engine::{CryptoEngine, SealedSecret, CIPHER_METHOD};
pub use token::{generate_key, generate_token, is_valid_token};
