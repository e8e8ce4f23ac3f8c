//! Error taxonomy for the transport, token, and API layers.
//!
//! Each layer wraps the one below it without discarding the original status
//! code or message, so callers can tell an absent resource from a denied
//! request, a malformed payload, or a server fault.

/// Building the underlying HTTP client failed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("client init error: {0}")]
pub struct InitError(pub String);

/// The HTTP primitive failed or the server answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    /// HTTP status code, if the server answered
    pub status: Option<u16>,
    /// Error message from the transport or response body
    pub message: String,
}

impl TransportError {
    /// Failure with an HTTP status.
    #[must_use]
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure before any response was received.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// The client-credentials exchange failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    /// Token request failed at the transport level
    #[error("{message}")]
    Transport {
        /// HTTP status code, if the server answered
        status: Option<u16>,
        /// Error message from the transport
        message: String,
    },
    /// Token response could not be turned into an access token
    #[error("{0}")]
    Parse(String),
}

impl AuthenticationError {
    /// HTTP status code carried over from the transport, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Parse(_) => None,
        }
    }

    /// Whether the response arrived but could not be parsed.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl From<TransportError> for AuthenticationError {
    fn from(err: TransportError) -> Self {
        Self::Transport {
            status: err.status,
            message: err.message,
        }
    }
}

/// A domain API call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Server answered 403
    #[error("{message}")]
    AccessDenied {
        /// HTTP status code
        status: u16,
        /// Error message from the transport
        message: String,
    },
    /// Server answered 404
    #[error("{message}")]
    NotFound {
        /// HTTP status code
        status: u16,
        /// Error message from the transport
        message: String,
    },
    /// Any other transport failure
    #[error("{message}")]
    Remote {
        /// HTTP status code, if the server answered
        status: Option<u16>,
        /// Error message from the transport
        message: String,
    },
    /// Response body could not be decoded or parsed
    #[error("{0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status code carried over from the transport, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AccessDenied { status, .. } | Self::NotFound { status, .. } => Some(*status),
            Self::Remote { status, .. } => *status,
            Self::Parse(_) => None,
        }
    }

    /// Whether the response arrived but could not be parsed.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let TransportError { status, message } = err;
        match status {
            Some(403) => Self::AccessDenied {
                status: 403,
                message,
            },
            Some(404) => Self::NotFound {
                status: 404,
                message,
            },
            _ => Self::Remote { status, message },
        }
    }
}
