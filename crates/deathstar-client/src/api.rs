//! Authenticated Death Star API operations.
//!
//! Every call carries `Authorization: Bearer <token>`. Transport failures are
//! mapped by status code:
//!
//! | status | error |
//! |---|---|
//! | 403 | [`ApiError::AccessDenied`] |
//! | 404 | [`ApiError::NotFound`] |
//! | other | [`ApiError::Remote`] |
//!
//! Every string field of a read response is droidspeak and goes through the
//! [`Decoder`] before the record is built.

use crate::error::ApiError;
use crate::token::parse_object;
use crate::transport::{HttpResponse, HttpTransport, RequestOptions, TransportClient};
use deathstar_core::{
    AccessToken, Decoder, DroidspeakDecoder, Prisoner, PrisonerFactory, RawMapping, RecordFactory,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;
use serde_json::Value;

/// Characters escaped when a value is used as a single path segment.
const PATH_SEGMENT_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

const AUTHORIZATION: &str = "Authorization";
const TORPEDOES_HEADER: &str = "x-torpedoes";

/// Typed client for the Death Star API.
#[derive(Debug, Clone)]
pub struct DeathStarApi<T, D = DroidspeakDecoder> {
    client: TransportClient<T>,
    decoder: D,
    prisoner_factory: PrisonerFactory,
}

impl<T: HttpTransport> DeathStarApi<T> {
    /// Create an API client that decodes responses as droidspeak.
    #[must_use]
    pub fn new(client: TransportClient<T>) -> Self {
        Self::with_decoder(client, DroidspeakDecoder)
    }
}

impl<T: HttpTransport, D: Decoder> DeathStarApi<T, D> {
    /// Create an API client with a custom response decoder.
    #[must_use]
    pub fn with_decoder(client: TransportClient<T>, decoder: D) -> Self {
        Self {
            client,
            decoder,
            prisoner_factory: PrisonerFactory,
        }
    }

    /// Fire `torpedoes` torpedoes into reactor exhaust `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] mapped from the transport failure.
    pub async fn delete_exhaust(
        &self,
        token: &AccessToken,
        id: u64,
        torpedoes: u32,
    ) -> Result<(), ApiError> {
        let endpoint = format!("reactor/exhaust/{id}");
        let options = RequestOptions::new().header(TORPEDOES_HEADER, torpedoes.to_string());

        self.request(token, Method::DELETE, &endpoint, options).await?;

        tracing::info!(id, torpedoes, "Reactor exhaust deleted");
        Ok(())
    }

    /// Look up a prisoner by name.
    ///
    /// Returns `Ok(None)` when the server answers 404.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AccessDenied`] or [`ApiError::Remote`] for other
    /// transport failures, and [`ApiError::Parse`] when the body is empty,
    /// cannot be decoded, or is missing prisoner fields.
    pub async fn get_prisoner(
        &self,
        token: &AccessToken,
        name: &str,
    ) -> Result<Option<Prisoner>, ApiError> {
        let endpoint = format!("prisoner/{}", utf8_percent_encode(name, PATH_SEGMENT_ESCAPE));

        let response = match self
            .request(token, Method::GET, &endpoint, RequestOptions::new())
            .await
        {
            Ok(response) => response,
            Err(ApiError::NotFound { .. }) => {
                tracing::debug!(name, "Prisoner not found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let Some(raw) = parse_object(&response.body) else {
            return Err(ApiError::Parse(
                "Cannot not parse Prisoner from empty response body".to_string(),
            ));
        };

        let data = self
            .decode_mapping(raw)
            .map_err(|reason| ApiError::Parse(format!("Error decoding response: {reason}")))?;

        let prisoner = self
            .prisoner_factory
            .create_from_mapping(&data)
            .map_err(|e| {
                ApiError::Parse(format!("Could not parse Prisoner from response body: {e}"))
            })?;

        Ok(Some(prisoner))
    }

    /// Send an authenticated request.
    ///
    /// The bearer header is applied after the operation headers so it cannot
    /// be shadowed.
    async fn request(
        &self,
        token: &AccessToken,
        method: Method,
        endpoint: &str,
        mut options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        options.set_header(AUTHORIZATION, token.authorization_header());

        match self.client.request(method, endpoint, options).await {
            Ok(response) => Ok(response),
            // 404 is an expected answer for lookups; callers decide what it means
            Err(err) if err.status == Some(404) => {
                tracing::debug!(endpoint, error = %err, "API resource not found");
                Err(ApiError::from(err))
            }
            Err(err) => {
                tracing::warn!(endpoint, status = ?err.status, error = %err, "API request failed");
                Err(ApiError::from(err))
            }
        }
    }

    /// Run every value of `raw` through the decoder, preserving key order.
    fn decode_mapping(&self, raw: RawMapping) -> Result<RawMapping, String> {
        raw.into_iter()
            .map(|(key, value)| match value {
                Value::String(encoded) => self
                    .decoder
                    .decode(&encoded)
                    .map(|decoded| (key, Value::String(decoded)))
                    .map_err(|e| e.to_string()),
                _ => Err(format!("\"{key}\" is not a string value")),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::testing::{capture_logs, CountingDecoder, MockTransport};
    use deathstar_core::encode_droidspeak;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const TEST_DROIDSPEAK_1: &str = "01000011 01100101 01101100";
    const TEST_DROIDSPEAK_2: &str = "00100000 00110010 00110001";
    const TEST_DROIDSPEAK_3: &str = "00100000 00100000 00110001";

    type TestApi = DeathStarApi<Arc<MockTransport>, Arc<CountingDecoder>>;

    fn api() -> (Arc<MockTransport>, Arc<CountingDecoder>, TestApi) {
        let transport = MockTransport::new();
        let decoder = CountingDecoder::new();
        let client = TransportClient::with_transport("https://api.com/", transport.clone()).unwrap();
        let api = DeathStarApi::with_decoder(client, decoder.clone());
        (transport, decoder, api)
    }

    fn test_token() -> AccessToken {
        AccessToken::new("abcdef", 99999, "Bearer", "testscope")
    }

    fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn delete_exhaust() {
        let (transport, _, api) = api();

        api.delete_exhaust(&test_token(), 1, 2).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(requests[0].url, "https://api.com/reactor/exhaust/1");
        assert_eq!(
            requests[0].headers,
            headers(&[
                ("Authorization", "Bearer abcdef"),
                ("Content-Type", "application/json"),
                ("x-torpedoes", "2"),
            ])
        );
    }

    #[tokio::test]
    async fn delete_exhaust_ignores_response_body() {
        let (transport, decoder, api) = api();
        transport.push_response(Ok(HttpResponse::ok(r#"{"status":"not droidspeak"}"#)));

        tokio_test::assert_ok!(api.delete_exhaust(&test_token(), 1, 2).await);
        assert_eq!(decoder.calls(), 0);
    }

    #[tokio::test]
    async fn delete_exhaust_with_invalid_access_token() {
        let (transport, _, api) = api();
        transport.push_response(Err(TransportError::with_status(403, "Access Denied")));

        let err = api.delete_exhaust(&test_token(), 1, 2).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::AccessDenied {
                status: 403,
                message: "Access Denied".to_string()
            }
        );
    }

    #[tokio::test]
    async fn delete_exhaust_that_does_not_exist() {
        let (transport, _, api) = api();
        transport.push_response(Err(TransportError::with_status(404, "Not found")));

        let err = api.delete_exhaust(&test_token(), 1, 2).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::NotFound {
                status: 404,
                message: "Not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn delete_exhaust_with_remote_server_error() {
        let (transport, _, api) = api();
        transport.push_response(Err(TransportError::with_status(500, "Internal server error")));

        let err = api.delete_exhaust(&test_token(), 1, 2).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Remote {
                status: Some(500),
                message: "Internal server error".to_string()
            }
        );
    }

    #[tokio::test]
    async fn bearer_header_cannot_be_shadowed() {
        let (transport, _, api) = api();
        let options = RequestOptions::new()
            .header("authorization", "Bearer stolen")
            .header("x-torpedoes", "2");

        api.request(&test_token(), Method::DELETE, "reactor/exhaust/1", options)
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].headers,
            headers(&[
                ("Authorization", "Bearer abcdef"),
                ("Content-Type", "application/json"),
                ("x-torpedoes", "2"),
            ])
        );
    }

    #[tokio::test]
    async fn get_prisoner() {
        let (transport, decoder, api) = api();
        let body = serde_json::json!({
            "name": encode_droidspeak("leia"),
            "cell": encode_droidspeak("a"),
            "block": encode_droidspeak("b"),
        });
        transport.push_response(Ok(HttpResponse::ok(body.to_string())));

        let prisoner = api
            .get_prisoner(&test_token(), "leia")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(prisoner, Prisoner::new("leia", "a", "b"));
        assert_eq!(decoder.calls(), 3);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].url, "https://api.com/prisoner/leia");
        assert_eq!(
            requests[0].headers,
            headers(&[
                ("Authorization", "Bearer abcdef"),
                ("Content-Type", "application/json"),
            ])
        );
    }

    #[tokio::test]
    async fn get_prisoner_decodes_whitespace_and_digits() {
        let (transport, _, api) = api();
        let body = serde_json::json!({
            "name": TEST_DROIDSPEAK_1,
            "cell": TEST_DROIDSPEAK_2,
            "block": TEST_DROIDSPEAK_3,
        });
        transport.push_response(Ok(HttpResponse::ok(body.to_string())));

        let prisoner = api
            .get_prisoner(&test_token(), "leia")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(prisoner.name(), "Cel");
        assert_eq!(prisoner.cell(), " 21");
        assert_eq!(prisoner.block(), "  1");
    }

    #[tokio::test]
    async fn get_prisoner_escapes_name_in_path() {
        let (transport, _, api) = api();
        transport.push_response(Err(TransportError::with_status(404, "Not found")));

        let _ = api.get_prisoner(&test_token(), "han solo/2").await;

        assert_eq!(
            transport.requests()[0].url,
            "https://api.com/prisoner/han%20solo%2F2"
        );
    }

    #[tokio::test]
    async fn get_prisoner_with_invalid_access_token() {
        let (transport, decoder, api) = api();
        transport.push_response(Err(TransportError::with_status(403, "Access Denied")));

        let err = api.get_prisoner(&test_token(), "leia").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::AccessDenied {
                status: 403,
                message: "Access Denied".to_string()
            }
        );
        assert_eq!(decoder.calls(), 0);
    }

    #[tokio::test]
    async fn get_prisoner_that_does_not_exist() {
        let (transport, decoder, api) = api();
        transport.push_response(Err(TransportError::with_status(404, "Not found")));

        let result = api.get_prisoner(&test_token(), "leia").await.unwrap();

        assert!(result.is_none());
        assert_eq!(decoder.calls(), 0);
    }

    #[test]
    fn missing_prisoner_is_not_logged_as_failure() {
        let (transport, _, api) = api();
        transport.push_response(Err(TransportError::with_status(404, "Not found")));

        let (result, logs) = capture_logs(api.get_prisoner(&test_token(), "leia"));

        assert_eq!(result, Ok(None));
        assert!(logs.contains("API resource not found"));
        assert!(!logs.contains("WARN"));
        assert!(!logs.contains("API request failed"));
    }

    #[test]
    fn server_error_is_logged_as_failure() {
        let (transport, _, api) = api();
        transport.push_response(Err(TransportError::with_status(500, "Internal server error")));

        let (result, logs) = capture_logs(api.get_prisoner(&test_token(), "leia"));

        assert!(result.is_err());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("API request failed"));
    }

    #[tokio::test]
    async fn get_prisoner_with_remote_server_error() {
        let (transport, decoder, api) = api();
        transport.push_response(Err(TransportError::with_status(500, "Internal server error")));

        let err = api.get_prisoner(&test_token(), "leia").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Internal server error");
        assert!(matches!(err, ApiError::Remote { .. }));
        assert_eq!(decoder.calls(), 0);
    }

    #[tokio::test]
    async fn get_prisoner_with_response_body_that_cannot_be_decoded() {
        let (transport, _, api) = api();
        let body = serde_json::json!({
            "name": TEST_DROIDSPEAK_1,
            "cell": TEST_DROIDSPEAK_2,
            "block": "0010000000100000",
        });
        transport.push_response(Ok(HttpResponse::ok(body.to_string())));

        let err = api.get_prisoner(&test_token(), "leia").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Parse(
                "Error decoding response: \"0010000000100000\" is too long to be an 8 bit string"
                    .to_string()
            )
        );
        assert!(err.is_parse_error());
    }

    #[tokio::test]
    async fn get_prisoner_stops_decoding_at_first_failure() {
        let (transport, decoder, api) = api();
        let body = serde_json::json!({
            "name": "0100001a",
            "cell": TEST_DROIDSPEAK_2,
            "block": TEST_DROIDSPEAK_3,
        });
        transport.push_response(Ok(HttpResponse::ok(body.to_string())));

        let err = api.get_prisoner(&test_token(), "leia").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error decoding response: \"0100001a\" contains non-binary characters"
        );
        assert_eq!(decoder.calls(), 1);
    }

    #[tokio::test]
    async fn get_prisoner_with_non_string_value() {
        let (transport, _, api) = api();
        let body = serde_json::json!({ "name": TEST_DROIDSPEAK_1, "cell": 2187, "block": "" });
        transport.push_response(Ok(HttpResponse::ok(body.to_string())));

        let err = api.get_prisoner(&test_token(), "leia").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Parse("Error decoding response: \"cell\" is not a string value".to_string())
        );
    }

    #[tokio::test]
    async fn get_prisoner_with_empty_response_body() {
        let (transport, decoder, api) = api();
        transport.push_response(Ok(HttpResponse::ok("")));

        let err = api.get_prisoner(&test_token(), "leia").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Parse("Cannot not parse Prisoner from empty response body".to_string())
        );
        assert_eq!(decoder.calls(), 0);
    }

    #[tokio::test]
    async fn get_prisoner_with_missing_data() {
        let (transport, decoder, api) = api();
        let body = serde_json::json!({ "block": TEST_DROIDSPEAK_2 });
        transport.push_response(Ok(HttpResponse::ok(body.to_string())));

        let err = api.get_prisoner(&test_token(), "leia").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Parse(
                "Could not parse Prisoner from response body: Cannot create Prisoner: \
                 Missing value for name, cell"
                    .to_string()
            )
        );
        assert_eq!(decoder.calls(), 1);
    }
}
