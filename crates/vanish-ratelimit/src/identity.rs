// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client address resolution and identity hashing.

use std::net::{IpAddr, Ipv4Addr};

use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use tracing::warn;
use vanish_core::VanishError;
use zeroize::Zeroizing;

/// Headers consulted, in order, when proxy headers are trusted.
pub const PROXY_HEADERS: [&str; 6] = [
    "client-ip",
    "x-forwarded-for",
    "x-forwarded",
    "x-cluster-client-ip",
    "forwarded-for",
    "forwarded",
];

/// Parse one comma-separated element of a proxy header.
///
/// Accepts bare addresses plus the `for=` form of RFC 7239, with optional
/// quotes, brackets and port.
fn parse_candidate(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    if let Ok(ip) = raw.parse() {
        return Some(ip);
    }

    let value = raw
        .split(';')
        .map(str::trim)
        .find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            k.trim().eq_ignore_ascii_case("for").then_some(v.trim())
        })?
        .trim_matches('"');

    if let Ok(ip) = value.parse() {
        return Some(ip);
    }
    // "[2001:db8::1]:4711" or "192.0.2.43:47011"
    if let Some(rest) = value.strip_prefix('[') {
        return rest.split_once(']')?.0.parse().ok();
    }
    value.rsplit_once(':')?.0.parse().ok()
}

/// Resolve the client address for a request.
///
/// With `trust_proxy` set, the first valid address in [`PROXY_HEADERS`] wins,
/// scanning each header's comma-separated list left to right. Otherwise, or
/// when no header yields an address, the socket peer is used. Falls back to
/// `0.0.0.0` when nothing is known.
pub fn resolve_client_ip<'h>(
    header: impl Fn(&str) -> Option<&'h str>,
    peer: Option<IpAddr>,
    trust_proxy: bool,
) -> IpAddr {
    if trust_proxy {
        let forwarded = PROXY_HEADERS
            .iter()
            .filter_map(|name| header(name))
            .flat_map(|value| value.split(','))
            .find_map(parse_candidate);
        if let Some(ip) = forwarded {
            return ip;
        }
    }
    peer.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Salted one-way hash of client addresses.
///
/// The salt must stay fixed for the process lifetime, otherwise every
/// request looks like a new client.
pub struct IdentityHasher {
    salt: Zeroizing<String>,
}

impl IdentityHasher {
    /// Use the configured salt, or generate a random one for this process.
    pub fn new(configured: Option<&str>) -> Result<Self, VanishError> {
        let salt = match configured.filter(|s| !s.is_empty()) {
            Some(s) => s.to_string(),
            None => {
                let mut bytes = [0u8; 32];
                SystemRandom::new()
                    .fill(&mut bytes)
                    .map_err(|_| VanishError::Internal("system RNG failure".to_string()))?;
                warn!(
                    "rate_limit.identity_salt is not set; using a per-process salt, \
                     counters will not carry over restarts"
                );
                hex::encode(bytes)
            }
        };
        Ok(Self {
            salt: Zeroizing::new(salt),
        })
    }

    /// Hex SHA-256 of the textual address followed by the salt.
    pub fn hash(&self, ip: &IpAddr) -> String {
        let mut hasher = Sha256::new();
        hasher.update(ip.to_string().as_bytes());
        hasher.update(self.salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Debug for IdentityHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityHasher")
            .field("salt", &"[redacted]")
            .finish()
    }
}
