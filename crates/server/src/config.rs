//! Configuration loading and validation for the checksum service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::payload::{DEFAULT_DATA, DEFAULT_NAME};

/// Validated checksum service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// IP address both listeners bind to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Plaintext port. Every request here is redirected to [`Config::https_port`].
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Port the HTTPS server listens on.
    #[serde(default = "default_https_port")]
    pub https_port: u16,

    /// Filesystem path to the PEM-encoded TLS certificate chain. **Required.**
    pub tls_cert_path: String,

    /// Filesystem path to the PEM-encoded TLS private key. **Required.**
    pub tls_key_path: String,

    /// Host used in redirect targets when a plaintext request carries no `Host`.
    #[serde(default)]
    pub redirect_host: Option<String>,

    /// Label returned on the `Name:` line.
    #[serde(default = "default_payload_name")]
    pub payload_name: String,

    /// String whose checksum is served on the `Data:` line.
    #[serde(default = "default_payload_data")]
    pub payload_data: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0".into()
}
fn default_http_port() -> u16 {
    8080
}
fn default_https_port() -> u16 {
    8443
}
fn default_payload_name() -> String {
    DEFAULT_NAME.into()
}
fn default_payload_data() -> String {
    DEFAULT_DATA.into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Socket address of the plaintext redirect listener.
    pub fn http_addr(&self) -> Result<SocketAddr> {
        Ok((self.bind_ip()?, self.http_port).into())
    }

    /// Socket address of the HTTPS listener.
    pub fn https_addr(&self) -> Result<SocketAddr> {
        Ok((self.bind_ip()?, self.https_port).into())
    }

    /// The OTLP endpoint, treating a blank value as unset.
    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otel_exporter_otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn bind_ip(&self) -> Result<IpAddr> {
        self.bind_address
            .trim()
            .parse()
            .with_context(|| format!("BIND_ADDRESS is not an IP address: {}", self.bind_address))
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.tls_cert_path, "TLS_CERT_PATH")?;
        ensure_non_empty(&self.tls_key_path, "TLS_KEY_PATH")?;
        ensure_single_line(&self.payload_name, "PAYLOAD_NAME")?;
        ensure_single_line(&self.payload_data, "PAYLOAD_DATA")?;
        self.bind_ip()?;

        if self.http_port == 0 || self.https_port == 0 {
            anyhow::bail!("HTTP_PORT and HTTPS_PORT must be non-zero");
        }
        if self.http_port == self.https_port {
            anyhow::bail!("HTTP_PORT and HTTPS_PORT must differ");
        }
        if let Some(host) = &self.redirect_host {
            ensure_non_empty(host, "REDIRECT_HOST")?;
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

fn ensure_single_line(value: &str, name: &str) -> Result<()> {
    ensure_non_empty(value, name)?;
    if value.contains(['\n', '\r']) {
        anyhow::bail!("{name} must be a single line");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            bind_address: default_bind_address(),
            http_port: default_http_port(),
            https_port: default_https_port(),
            tls_cert_path: "/etc/checksum-svc/tls.crt".into(),
            tls_key_path: "/etc/checksum-svc/tls.key".into(),
            redirect_host: None,
            payload_name: default_payload_name(),
            payload_data: default_payload_data(),
            log_level: default_log_level(),
            otel_exporter_otlp_endpoint: None,
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_bind_address(), "0.0.0.0");
        assert_eq!(default_http_port(), 8080);
        assert_eq!(default_https_port(), 8443);
        assert_eq!(default_payload_name(), "Dylan H");
        assert_eq!(default_payload_data(), "Hello World Check Sum! - Dylan Harmon");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_tls_cert_path() {
        let cfg = Config {
            tls_cert_path: "  ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_tls_key_path() {
        let cfg = Config {
            tls_key_path: "".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_equal_ports() {
        let cfg = Config {
            http_port: 8443,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            https_port: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_bind_address() {
        let cfg = Config {
            bind_address: "localhost".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_multiline_payload() {
        let cfg = Config {
            payload_data: "line one\nline two".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_redirect_host() {
        let cfg = Config {
            redirect_host: Some(" ".into()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn addrs_combine_bind_address_and_ports() {
        let cfg = Config {
            bind_address: "127.0.0.1".into(),
            ..valid()
        };
        assert_eq!(cfg.http_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.https_addr().unwrap().to_string(), "127.0.0.1:8443");
    }

    #[test]
    fn blank_otlp_endpoint_is_unset() {
        let cfg = Config {
            otel_exporter_otlp_endpoint: Some("  ".into()),
            ..valid()
        };
        assert_eq!(cfg.otlp_endpoint(), None);

        let cfg = Config {
            otel_exporter_otlp_endpoint: Some("http://collector:4317".into()),
            ..valid()
        };
        assert_eq!(cfg.otlp_endpoint(), Some("http://collector:4317"));
    }
}
