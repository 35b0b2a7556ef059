//! Request and response types exchanged between components.
//!
//! The checksum report is line-oriented plain text; errors are JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Checksum endpoint
// ---------------------------------------------------------------------------

/// Line prefix for the payload name.
pub const NAME_PREFIX: &str = "Name: ";
/// Line prefix for the payload data.
pub const DATA_PREFIX: &str = "Data: ";
/// Line prefix for the rendered checksum.
pub const CHECKSUM_PREFIX: &str = "Checksum: ";

/// Successful response for `GET /hash`.
///
/// Rendered as exactly three `\n`-separated lines, always in this order:
///
/// ```text
/// Name: <name>
/// Data: <data>
/// Checksum: <64 lowercase hex digits>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumReport {
    /// Label identifying who published the data.
    pub name: String,
    /// The exact string that was hashed.
    pub data: String,
    /// Lowercase hex SHA-256 of `data` encoded as UTF-8.
    pub checksum: String,
}

impl ChecksumReport {
    /// Render the plain-text body. No trailing newline.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChecksumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NAME_PREFIX}{}\n{DATA_PREFIX}{}\n{CHECKSUM_PREFIX}{}",
            self.name, self.data, self.checksum
        )
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"hash_unavailable"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ChecksumReport {
        ChecksumReport {
            name: "Dylan H".into(),
            data: "Hello World Check Sum! - Dylan Harmon".into(),
            checksum: "ca296c94eac58f5717cb39b8f74a4ff1c52fca7a07d8f61976884d8fa274cea8".into(),
        }
    }

    #[test]
    fn render_has_three_ordered_lines() {
        let body = report().render();
        let lines: Vec<&str> = body.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Name: Dylan H");
        assert_eq!(lines[1], "Data: Hello World Check Sum! - Dylan Harmon");
        assert!(lines[2].starts_with(CHECKSUM_PREFIX));
    }

    #[test]
    fn render_has_no_trailing_newline() {
        assert!(!report().render().ends_with('\n'));
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("hash_unavailable", "SHA-256 is not available");
        assert_eq!(e.code, "hash_unavailable");
        assert!(e.message.contains("SHA-256"));
    }

    #[test]
    fn error_response_serialises_code_and_message() {
        let e = ErrorResponse::new("not_found", "nope");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["message"], "nope");
    }
}
