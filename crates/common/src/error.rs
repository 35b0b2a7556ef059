//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::HashUnavailable`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request cannot be served as sent, e.g. a plaintext request with no host to redirect to.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The digest primitive could not be used. Environmental; never retried.
    #[error("hash algorithm unavailable: {0}")]
    HashUnavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::HashUnavailable(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::HashUnavailable(_) => "hash_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::HashUnavailable("x".into()).http_status(), 500);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
        assert_eq!(
            ServiceError::HashUnavailable("x".into()).code(),
            "hash_unavailable"
        );
        assert_eq!(ServiceError::Internal("x".into()).code(), "internal_error");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::HashUnavailable("SHA-256".into());
        assert!(e.to_string().contains("SHA-256"));
    }
}
