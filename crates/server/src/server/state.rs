//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use common::protocol::ChecksumReport;

use crate::digest::{render_checksum, DigestError, Digester, Sha256Digester};
use crate::payload::Payload;

/// Application state shared across all request handlers.
///
/// Both fields are `Arc`-backed so Axum can clone the state per request
/// without copying the payload.
#[derive(Clone)]
pub struct AppState {
    /// The immutable name/data pair published by `GET /hash`.
    pub payload: Payload,
    /// Hash primitive used to checksum the payload data.
    pub digester: Arc<dyn Digester>,
}

impl AppState {
    /// Create a new [`AppState`] from the startup payload and a digester.
    pub fn new(payload: Payload, digester: Arc<dyn Digester>) -> Self {
        Self { payload, digester }
    }

    /// Compute the report for the current payload.
    ///
    /// # Errors
    ///
    /// Returns a [`DigestError`] if the hash primitive is unavailable.
    pub fn report(&self) -> Result<ChecksumReport, DigestError> {
        let checksum = render_checksum(self.digester.as_ref(), self.payload.data_bytes())?;
        Ok(ChecksumReport {
            name: self.payload.name().to_owned(),
            data: self.payload.data().to_owned(),
            checksum,
        })
    }
}

impl Default for AppState {
    /// Default payload hashed with SHA-256.
    fn default() -> Self {
        Self::new(Payload::default(), Arc::new(Sha256Digester))
    }
}
