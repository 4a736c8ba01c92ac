/*
[INPUT]:  Options snapshot (base URL, timeout) and a bearer token provider
[OUTPUT]: Configured reqwest client issuing authorized GET requests
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing request/response handling
*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::auth::{BearerTokenProvider, OptionsMonitor, OptionsTokenProvider, TdAmeritradeOptions};
use crate::http::{Result, TdAmeritradeError};

/// Query parameters in send order; absent optional values are never pushed.
pub(crate) type QueryParams = Vec<(&'static str, String)>;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Take the request timeout from an options snapshot
    pub fn from_options(options: &TdAmeritradeOptions) -> Self {
        Self {
            timeout: options.timeout(),
            ..Self::default()
        }
    }
}

/// Main HTTP client for the TD Ameritrade REST API.
///
/// Cheap to clone. The bearer token is fetched from the provider and attached
/// to each request individually, so concurrent calls never share header state.
#[derive(Clone)]
pub struct TdAmeritradeClient {
    http_client: Client,
    base_url: Url,
    token_provider: Arc<dyn BearerTokenProvider>,
}

impl std::fmt::Debug for TdAmeritradeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TdAmeritradeClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TdAmeritradeClient {
    /// Create a client that reads its token from the monitor on every call.
    ///
    /// Base URL and timeout are taken from the snapshot current at construction.
    pub fn from_monitor(monitor: OptionsMonitor) -> Result<Self> {
        let options = monitor.current();
        Self::with_config_and_base_url(
            ClientConfig::from_options(&options),
            &options.base_url,
            Arc::new(OptionsTokenProvider::new(monitor)),
        )
    }

    /// Create a client with custom configuration
    pub fn with_config(
        config: ClientConfig,
        options: &TdAmeritradeOptions,
        token_provider: Arc<dyn BearerTokenProvider>,
    ) -> Result<Self> {
        Self::with_config_and_base_url(config, &options.base_url, token_provider)
    }

    /// Create a client against an explicit base URL (mock servers, sandboxes)
    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
        token_provider: Arc<dyn BearerTokenProvider>,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let base_url = TdAmeritradeOptions {
            base_url: base_url.to_string(),
            ..TdAmeritradeOptions::default()
        }
        .parsed_base_url()?;

        Ok(Self {
            http_client,
            base_url,
            token_provider,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for path segments under the versioned base.
    ///
    /// Every segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// a symbol or account id stay part of that segment.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        if segments
            .iter()
            .any(|segment| matches!(*segment, "" | "." | ".."))
        {
            return Err(TdAmeritradeError::InvalidRequest(
                "path segment is empty or a dot segment".to_string(),
            ));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TdAmeritradeError::Config(format!("base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Authorized GET, status check, then JSON decode.
    ///
    /// `route` names the endpoint for logging; `segments` may carry
    /// identifiers and are never logged.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        route: &'static str,
        segments: &[&str],
        query: &QueryParams,
    ) -> Result<T> {
        let url = self.endpoint_url(segments)?;
        let token = self.token_provider.bearer_token().await?;

        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(route, status = status.as_u16(), bytes = body.len(), "GET completed");

        if !status.is_success() {
            return Err(TdAmeritradeError::api_error(
                status,
                error_message(status, &body),
            ));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Same as [`get_json`](Self::get_json), aborted when `cancel` fires first
    pub(crate) async fn get_json_cancellable<T: DeserializeOwned>(
        &self,
        route: &'static str,
        segments: &[&str],
        query: &QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(route, "request cancelled");
                    Err(TdAmeritradeError::Cancelled)
                }
                result = self.get_json(route, segments, query) => result,
            },
            None => self.get_json(route, segments, query).await,
        }
    }
}

/// Extract the API's `{"error": "..."}` message, falling back to the raw body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: &str) -> TdAmeritradeClient {
        TdAmeritradeClient::with_config_and_base_url(
            ClientConfig::default(),
            &server.uri(),
            Arc::new(StaticTokenProvider::new(token)),
        )
        .expect("client init")
    }

    #[test]
    fn test_error_message_prefers_error_field() {
        let message = error_message(StatusCode::UNAUTHORIZED, r#"{"error":"Not Authorized"}"#);
        assert_eq!(message, "Not Authorized");
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, "  "), "Not Found");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream"), "upstream");
    }

    #[test]
    fn test_endpoint_url_keeps_version_segment() {
        let client = TdAmeritradeClient::with_config_and_base_url(
            ClientConfig::default(),
            "https://api.tdameritrade.com/v1",
            Arc::new(StaticTokenProvider::new("t")),
        )
        .unwrap();
        assert_eq!(
            client.endpoint_url(&["marketdata", "chains"]).unwrap().as_str(),
            "https://api.tdameritrade.com/v1/marketdata/chains"
        );
    }

    #[test]
    fn test_endpoint_url_encodes_each_segment() {
        let client = TdAmeritradeClient::with_config_and_base_url(
            ClientConfig::default(),
            "https://api.tdameritrade.com/v1/",
            Arc::new(StaticTokenProvider::new("t")),
        )
        .unwrap();

        let futures = client.endpoint_url(&["marketdata", "/ES", "pricehistory"]).unwrap();
        assert_eq!(futures.path(), "/v1/marketdata/%2FES/pricehistory");

        let fragment = client.endpoint_url(&["marketdata", "AB#C", "pricehistory"]).unwrap();
        assert_eq!(fragment.path(), "/v1/marketdata/AB%23C/pricehistory");
        assert_eq!(fragment.fragment(), None);

        let query = client.endpoint_url(&["marketdata", "../accounts?x=", "pricehistory"]).unwrap();
        assert_eq!(query.path(), "/v1/marketdata/..%2Faccounts%3Fx=/pricehistory");
        assert_eq!(query.query(), None);
    }

    #[test]
    fn test_endpoint_url_rejects_dot_segments() {
        let client = TdAmeritradeClient::with_config_and_base_url(
            ClientConfig::default(),
            "https://api.tdameritrade.com/v1/",
            Arc::new(StaticTokenProvider::new("t")),
        )
        .unwrap();

        for segment in ["..", ".", ""] {
            let err = client.endpoint_url(&["accounts", segment]).unwrap_err();
            assert!(matches!(err, TdAmeritradeError::InvalidRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_get_json_attaches_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(query_param("a", "1"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "tok");
        let value: serde_json::Value = client
            .get_json("ping", &["ping"], &vec![("a", "1".to_string())])
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "Not Authorized"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, "tok");
        let err = client
            .get_json::<serde_json::Value>("ping", &["ping"], &Vec::new())
            .await
            .unwrap_err();

        assert!(err.is_auth_error());
        match err {
            TdAmeritradeError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Not Authorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, "");
        let err = client
            .get_json::<serde_json::Value>("ping", &["ping"], &Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TdAmeritradeError::MissingToken));
    }

    #[tokio::test]
    async fn test_cancelled_before_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, "tok");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = client
            .get_json_cancellable::<serde_json::Value>("slow", &["slow"], &Vec::new(), Some(&cancel))
            .await
            .unwrap_err();
        assert!(matches!(err, TdAmeritradeError::Cancelled));
    }
}
