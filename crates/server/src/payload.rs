//! The fixed name/data pair served by `GET /hash`.

use std::sync::Arc;

/// Default label for the `Name:` line.
pub const DEFAULT_NAME: &str = "Dylan H";

/// Default string whose checksum is published.
pub const DEFAULT_DATA: &str = "Hello World Check Sum! - Dylan Harmon";

/// Immutable payload, frozen at startup and shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    name: Arc<str>,
    data: Arc<str>,
}

impl Payload {
    /// Create a payload from a name and the data to checksum.
    pub fn new(name: impl Into<Arc<str>>, data: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// The bytes that get hashed: `data` encoded as UTF-8.
    pub fn data_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_DATA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_payload_uses_constants() {
        let p = Payload::default();
        assert_eq!(p.name(), DEFAULT_NAME);
        assert_eq!(p.data(), DEFAULT_DATA);
        assert_eq!(p.data_bytes(), DEFAULT_DATA.as_bytes());
    }

    #[test]
    fn clones_share_storage() {
        let p = Payload::new("n", "d");
        let q = p.clone();
        assert!(Arc::ptr_eq(&p.data, &q.data));
    }
}
