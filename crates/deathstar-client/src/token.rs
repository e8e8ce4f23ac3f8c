//! Client-credentials token exchange.

use crate::error::AuthenticationError;
use crate::transport::{HttpTransport, RequestOptions, TransportClient};
use deathstar_core::{AccessToken, AccessTokenFactory, RawMapping, RecordFactory};
use reqwest::Method;
use serde_json::Value;

const TOKEN_ENDPOINT: &str = "token";

/// Obtains access tokens from the `token` endpoint.
#[derive(Debug, Clone)]
pub struct TokenProvider<T> {
    client: TransportClient<T>,
    factory: AccessTokenFactory,
}

impl<T: HttpTransport> TokenProvider<T> {
    /// Create a token provider over `client`.
    #[must_use]
    pub fn new(client: TransportClient<T>) -> Self {
        Self {
            client,
            factory: AccessTokenFactory,
        }
    }

    /// Exchange client credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::Transport`] if the request fails and
    /// [`AuthenticationError::Parse`] if the response is not a complete
    /// access token document.
    pub async fn get_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, AuthenticationError> {
        let options = RequestOptions::new()
            .header("Content-Type", "application/x-www-form-urlencoded")
            .form([
                ("grant_type", "client_credentials"),
                ("client_secret", client_secret),
                ("client_id", client_id),
            ]);

        let response = self
            .client
            .request(Method::POST, TOKEN_ENDPOINT, options)
            .await
            .map_err(|err| {
                tracing::warn!(status = ?err.status, error = %err, "Token request failed");
                AuthenticationError::from(err)
            })?;

        let Some(data) = parse_object(&response.body) else {
            return Err(AuthenticationError::Parse(
                "Could not parse access token from empty response body".to_string(),
            ));
        };

        let token = self.factory.create_from_mapping(&data).map_err(|e| {
            AuthenticationError::Parse(format!(
                "Could not parse access token from response body: {e}"
            ))
        })?;

        tracing::debug!(
            token_type = token.token_type(),
            scope = token.scope(),
            expires_in = token.expires_in(),
            "Obtained access token"
        );

        Ok(token)
    }
}

/// Parse `body` as a JSON object; anything else counts as no object.
pub(crate) fn parse_object(body: &str) -> Option<RawMapping> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
