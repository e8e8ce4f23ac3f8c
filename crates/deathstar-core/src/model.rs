//! Immutable domain records.
//!
//! Records are only built through the factories in [`crate::factory`], so a
//! value of either type always carries every required field.

use serde::Serialize;

/// A prisoner held aboard the station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Prisoner {
    name: String,
    cell: String,
    block: String,
}

impl Prisoner {
    /// Create a prisoner record.
    #[must_use]
    pub fn new(name: impl Into<String>, cell: impl Into<String>, block: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell: cell.into(),
            block: block.into(),
        }
    }

    /// Prisoner name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell the prisoner is held in.
    #[must_use]
    pub fn cell(&self) -> &str {
        &self.cell
    }

    /// Detention block of the cell.
    #[must_use]
    pub fn block(&self) -> &str {
        &self.block
    }
}

impl std::fmt::Display for Prisoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (cell {}, block {})", self.name, self.cell, self.block)
    }
}

/// Bearer credential issued by the token endpoint.
///
/// There is no refresh logic; the caller owns the token's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    access_token: String,
    expires_in: i64,
    token_type: String,
    scope: String,
}

impl AccessToken {
    /// Create an access token record.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        expires_in: i64,
        token_type: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in,
            token_type: token_type.into(),
            scope: scope.into(),
        }
    }

    /// The opaque token string.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Lifetime in seconds as reported by the server.
    #[must_use]
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Token type as reported by the server (usually `Bearer`).
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Granted scope.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Value for the `Authorization` request header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
