//! The [`Digester`] seam and its SHA-256 implementation.

use sha2::{Digest, Sha256};
use thiserror::Error;

use super::is_checksum;

/// Byte length of a SHA-256 digest (32 bytes = 256 bits).
pub const DIGEST_LEN: usize = 32;

/// Name reported for the production algorithm.
pub const SHA256: &str = "SHA-256";

/// Errors produced by the digest layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    /// The hash primitive cannot be instantiated in this environment.
    #[error("hash algorithm unsupported: {algorithm}")]
    Unsupported { algorithm: String },

    /// The primitive returned a digest of the wrong size.
    #[error("{algorithm} produced {len} bytes, expected {DIGEST_LEN}")]
    Malformed { algorithm: String, len: usize },
}

/// A hash primitive that turns bytes into a fixed-size digest.
#[cfg_attr(test, mockall::automock)]
pub trait Digester: Send + Sync {
    /// Algorithm name, used in logs and error messages.
    fn algorithm(&self) -> &'static str;

    /// Hash `data` and return the raw digest bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Unsupported`] if the primitive is unavailable.
    fn digest(&self, data: &[u8]) -> Result<Vec<u8>, DigestError>;
}

/// SHA-256 backed by the `sha2` crate. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digester;

impl Digester for Sha256Digester {
    fn algorithm(&self) -> &'static str {
        SHA256
    }

    fn digest(&self, data: &[u8]) -> Result<Vec<u8>, DigestError> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Ok(hasher.finalize().to_vec())
    }
}

/// Hash `data` with `digester` and render the digest as lowercase hex.
///
/// # Errors
///
/// Propagates [`DigestError::Unsupported`] from the primitive, and returns
/// [`DigestError::Malformed`] if the digest is not [`DIGEST_LEN`] bytes so a
/// short or long checksum never reaches a response body.
pub fn render_checksum(digester: &dyn Digester, data: &[u8]) -> Result<String, DigestError> {
    let digest = digester.digest(data)?;
    let checksum = hex::encode(&digest);
    if !is_checksum(&checksum) {
        return Err(DigestError::Malformed {
            algorithm: digester.algorithm().to_owned(),
            len: digest.len(),
        });
    }
    Ok(checksum)
}
