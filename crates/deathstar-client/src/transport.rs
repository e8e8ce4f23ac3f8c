//! HTTP transport for the Death Star API.
//!
//! [`HttpTransport`] is the seam over the wire: it takes a fully resolved
//! [`HttpRequest`] and either returns the response or a [`TransportError`].
//! [`ReqwestTransport`] is the production implementation and owns the TLS
//! client-certificate material. [`TransportClient`] sits on top of it,
//! prefixing the base URL and merging default request options.

use crate::config::ClientConfig;
use crate::error::{InitError, TransportError};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use url::Url;

/// Request body variants understood by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` key/value pairs
    Form(Vec<(String, String)>),
}

/// Caller-supplied request options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Request headers, matched case-insensitively on merge
    pub headers: BTreeMap<String, String>,
    /// Optional request body
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing header with the same name
    /// regardless of case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header in place, replacing any existing header with the same
    /// name regardless of case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Use a form-encoded body.
    #[must_use]
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    /// Look up a header value regardless of case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Merge these options onto `defaults`.
    ///
    /// Headers are merged key by key with these options winning on a name
    /// collision; default headers with no counterpart survive. The body is
    /// taken from these options when set, otherwise from `defaults`.
    #[must_use]
    pub fn merged_onto(self, defaults: RequestOptions) -> RequestOptions {
        let mut merged = RequestOptions {
            headers: defaults.headers,
            body: self.body.or(defaults.body),
        };
        for (name, value) in self.headers {
            merged.set_header(name, value);
        }
        merged
    }
}

/// A fully resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: BTreeMap<String, String>,
    /// Optional request body
    pub body: Option<RequestBody>,
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Response with status 200.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Sends a single HTTP request.
///
/// Implementations report non-success statuses as [`TransportError`] so that
/// callers only ever see 2xx responses on the `Ok` path.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and wait for the complete response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failures and non-2xx responses.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

/// [`HttpTransport`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a reqwest client from `config`.
    ///
    /// For `https://` base URLs the optional CA bundle and the client
    /// certificate/key pair are loaded into the client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created, or if TLS
    /// certificate files cannot be read or parsed.
    pub fn new(config: &ClientConfig) -> Result<Self, InitError> {
        let mut builder = Client::builder().timeout(config.timeout);

        if config.is_https() {
            // Enable rustls for HTTPS
            builder = builder.use_rustls_tls();

            // Load custom CA certificate if provided (for self-signed certs)
            if let Some(ca_path) = &config.ca_cert_path {
                let ca_cert = fs::read(ca_path).map_err(|e| {
                    InitError(format!(
                        "failed to read CA certificate {}: {e}",
                        ca_path.display()
                    ))
                })?;
                let cert = reqwest::Certificate::from_pem(&ca_cert)
                    .map_err(|e| InitError(format!("failed to parse CA certificate: {e}")))?;
                builder = builder.add_root_certificate(cert);
                tracing::debug!(ca_path = %ca_path.display(), "Loaded custom CA certificate");
            }

            // Load client certificate and key for mTLS; a lone half is a config error
            match (&config.ssl_cert_path, &config.ssl_key_path) {
                (Some(cert_path), Some(key_path)) => {
                    let cert_pem = fs::read(cert_path).map_err(|e| {
                        InitError(format!(
                            "failed to read client certificate {}: {e}",
                            cert_path.display()
                        ))
                    })?;
                    let key_pem = fs::read(key_path).map_err(|e| {
                        InitError(format!(
                            "failed to read client key {}: {e}",
                            key_path.display()
                        ))
                    })?;

                    // Combine cert and key into a single PEM for identity
                    let mut identity_pem = cert_pem;
                    identity_pem.extend_from_slice(&key_pem);

                    let identity = reqwest::Identity::from_pem(&identity_pem).map_err(|e| {
                        InitError(format!("failed to create client identity: {e}"))
                    })?;
                    builder = builder.identity(identity);
                    tracing::debug!(
                        cert_path = %cert_path.display(),
                        key_path = %key_path.display(),
                        "Loaded client certificate for mTLS"
                    );
                }
                (Some(_), None) | (None, Some(_)) => {
                    return Err(InitError(
                        "client certificate and key must both be set".to_string(),
                    ));
                }
                (None, None) => {}
            }
        }

        let client = builder.build().map_err(|e| InitError(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(RequestBody::Form(pairs)) = &request.body {
            builder = builder.form(pairs);
        }

        let response = builder.send().await.map_err(|e| TransportError {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::with_status(status.as_u16(), e.to_string()))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body
            };
            return Err(TransportError::with_status(status.as_u16(), message));
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Base-URL-aware client over an [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportClient<T> {
    transport: T,
    base_url: String,
}

impl TransportClient<ReqwestTransport> {
    /// Create a reqwest-backed client from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the reqwest client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, InitError> {
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(&config.base_url, transport)
    }
}

impl<T: HttpTransport> TransportClient<T> {
    /// Create a client over an existing transport.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not an absolute `http` or `https` URL.
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, InitError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| InitError(format!("invalid base URL {base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(InitError(format!(
                "unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            transport,
            base_url: base_url.to_string(),
        })
    }

    /// The configured URL prefix.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Options every request starts from.
    #[must_use]
    pub fn default_options() -> RequestOptions {
        RequestOptions::new().header("Content-Type", "application/json")
    }

    /// Send `method` to `path` relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] with the original status code and message
    /// when the request fails.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let options = options.merged_onto(Self::default_options());

        tracing::debug!(%method, url, "Sending request");

        let request = HttpRequest {
            method,
            url,
            headers: options.headers,
            body: options.body,
        };

        self.transport.send(request).await.map_err(|err| {
            tracing::debug!(status = ?err.status, error = %err, "Request failed");
            err
        })
    }
}
