//! # Death Star API Client
//!
//! HTTP transport, client-credentials token exchange, and typed operations
//! for the Death Star API.
//!
//! ## Layers
//!
//! - [`TransportClient`]: prefixes the base URL, merges default request
//!   options, and reports every failure as a [`TransportError`]
//! - [`TokenProvider`]: exchanges client credentials for an `AccessToken`
//! - [`DeathStarApi`]: authenticated domain operations; maps transport
//!   failures to [`ApiError`] by status code and decodes droidspeak payloads
//!
//! The wire itself sits behind [`HttpTransport`], implemented for reqwest by
//! [`ReqwestTransport`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod error;
pub mod token;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::DeathStarApi;
pub use config::ClientConfig;
pub use error::{ApiError, AuthenticationError, InitError, TransportError};
pub use reqwest::Method;
pub use token::TokenProvider;
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, RequestBody, RequestOptions, ReqwestTransport,
    TransportClient,
};
