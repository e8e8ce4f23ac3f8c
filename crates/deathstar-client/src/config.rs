//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Connection settings shared by every request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL prefix prepended verbatim to every endpoint (e.g., <https://death.star/api/>)
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Client certificate path for mTLS authentication (PEM format)
    pub ssl_cert_path: Option<PathBuf>,
    /// Client private key path for mTLS authentication (PEM format)
    pub ssl_key_path: Option<PathBuf>,
    /// Custom CA certificate path for self-signed server certs (PEM format)
    pub ca_cert_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8443/".to_string(),
            timeout: Duration::from_secs(30),
            ssl_cert_path: None,
            ssl_key_path: None,
            ca_cert_path: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for `base_url` with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the client certificate and private key used for mTLS.
    #[must_use]
    pub fn with_identity(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.ssl_cert_path = Some(cert.into());
        self.ssl_key_path = Some(key.into());
        self
    }

    /// Whether the base URL requires TLS.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}
