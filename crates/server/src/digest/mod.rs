//! SHA-256 digest computation and lowercase-hex checksum rendering.
//!
//! This module is free of HTTP dependencies. Handlers reach the hash primitive
//! only through the [`Digester`] trait so an unavailable primitive can be
//! simulated in tests.
//!
//! # Checksum format
//!
//! ```text
//! 64 lowercase hex digits, two per digest byte, zero-padded
//! ```

pub mod sha256;

pub use sha256::{render_checksum, Digester, DigestError, Sha256Digester, DIGEST_LEN};

#[cfg(test)]
pub use sha256::MockDigester;

/// Number of hex characters in a rendered SHA-256 checksum.
pub const CHECKSUM_LEN: usize = DIGEST_LEN * 2;

/// Returns `true` if `s` matches `^[0-9a-f]{64}$`.
pub fn is_checksum(s: &str) -> bool {
    s.len() == CHECKSUM_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
