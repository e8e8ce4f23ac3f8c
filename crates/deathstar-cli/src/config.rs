//! CLI configuration.

use anyhow::{Context, Result};
use deathstar_client::ClientConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for a CLI invocation.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Connection settings
    pub client: ClientConfig,

    /// OAuth client identifier
    pub client_id: Option<String>,

    /// OAuth client secret
    pub client_secret: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DEATHSTAR_BASE_URL`: URL prefix for every endpoint
    /// - `DEATHSTAR_SSL_CERT`: Client certificate (PEM)
    /// - `DEATHSTAR_SSL_KEY`: Client private key (PEM)
    /// - `DEATHSTAR_CA_CERT`: CA bundle for the server certificate (PEM)
    /// - `DEATHSTAR_TIMEOUT_SECS`: Request timeout in seconds
    /// - `DEATHSTAR_CLIENT_ID`: OAuth client identifier
    /// - `DEATHSTAR_CLIENT_SECRET`: OAuth client secret
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("DEATHSTAR_BASE_URL") {
            config.client.base_url = url;
        }

        if let Some(cert) = lookup("DEATHSTAR_SSL_CERT") {
            config.client.ssl_cert_path = Some(PathBuf::from(cert));
        }

        if let Some(key) = lookup("DEATHSTAR_SSL_KEY") {
            config.client.ssl_key_path = Some(PathBuf::from(key));
        }

        if let Some(ca) = lookup("DEATHSTAR_CA_CERT") {
            config.client.ca_cert_path = Some(PathBuf::from(ca));
        }

        if let Some(secs) = lookup("DEATHSTAR_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().context("Invalid DEATHSTAR_TIMEOUT_SECS")?;
            config.client.timeout = Duration::from_secs(secs);
        }

        config.client_id = lookup("DEATHSTAR_CLIENT_ID");
        config.client_secret = lookup("DEATHSTAR_CLIENT_SECRET");

        tracing::debug!(base_url = %config.client.base_url, "Loaded configuration");

        Ok(config)
    }

    /// Client credentials, required for any authenticated command.
    ///
    /// # Errors
    ///
    /// Returns error if either credential is missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let id = self
            .client_id
            .as_deref()
            .context("DEATHSTAR_CLIENT_ID is not set")?;
        let secret = self
            .client_secret
            .as_deref()
            .context("DEATHSTAR_CLIENT_SECRET is not set")?;
        Ok((id, secret))
    }
}
