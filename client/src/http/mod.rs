//! HTTP client adapter over the console API.
//!
//! The client owns transport details only: URL resolution through the
//! endpoint registry, default and auth headers, JSON bodies, timeout
//! enforcement, and normalisation of every failure into [`ApiError`].
//! Session state is read from the injected [`SessionStore`] on each
//! request; the client itself is stateless and cheap to clone.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::EnvironmentConfig;
use crate::endpoints::Endpoints;
use crate::session::SessionStore;

pub mod envelope;
pub mod error;

pub use envelope::{ApiResponse, SUCCESS_CODE};
pub use error::{ApiError, ApiResult};

/// Per-call request options consumed by [`ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Extra headers; they override the client defaults on collision.
    pub headers: HeaderMap,
    /// JSON body. Ignored for GET requests.
    pub body: Option<Value>,
    /// Per-call timeout override; the config default applies when absent.
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }
}

/// Typed HTTP client bound to one environment and one session store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    store: Arc<dyn SessionStore>,
    default_timeout: Duration,
}

impl ApiClient {
    /// Build a client for `config`, reading auth state from `store`.
    ///
    /// # Errors
    ///
    /// Fails when the base URL does not parse or the underlying transport
    /// cannot be constructed.
    pub fn new(config: &EnvironmentConfig, store: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let endpoints = Endpoints::new(&config.api_base_url)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(ApiError::from_transport)?;
        Ok(Self {
            http,
            endpoints,
            store,
            default_timeout: config.timeout,
        })
    }

    /// The endpoint registry bound to this client's base URL.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// The injected session store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Default timeout applied when a call carries no override.
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Issue a request and decode the response envelope.
    ///
    /// The send-and-read future races a timer; when the timer fires first
    /// the in-flight transfer is abandoned and the call fails with
    /// [`ApiError::Timeout`]. GET requests never carry a body regardless of
    /// what the options contain.
    ///
    /// # Errors
    ///
    /// All failure modes are normalised into [`ApiError`]; see the error
    /// module documentation.
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: Url,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse<T>> {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let token = self.store.token().await?;
        let headers = request_headers(options.headers, token.as_deref())?;

        debug!(method = %options.method, url = %url, "issuing API request");

        let mut builder = self
            .http
            .request(options.method.clone(), url)
            .headers(headers);
        if options.method != Method::GET {
            if let Some(body) = &options.body {
                builder = builder.json(body);
            }
        }

        match tokio::time::timeout(timeout, execute::<T>(builder)).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(ApiError::Timeout {
                message: format!("request timed out after {}ms", timeout.as_millis()),
            }),
        }
    }

    /// GET `url`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<ApiResponse<T>> {
        self.request(url, RequestOptions::default()).await
    }

    /// POST `url` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        self.request(
            url,
            RequestOptions {
                method: Method::POST,
                body: Some(encode_body(body)?),
                ..RequestOptions::default()
            },
        )
        .await
    }

    /// POST `url` without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> ApiResult<ApiResponse<T>> {
        self.request(
            url,
            RequestOptions {
                method: Method::POST,
                ..RequestOptions::default()
            },
        )
        .await
    }

    /// PUT `url` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        self.request(
            url,
            RequestOptions {
                method: Method::PUT,
                body: Some(encode_body(body)?),
                ..RequestOptions::default()
            },
        )
        .await
    }

    /// PATCH `url` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        self.request(
            url,
            RequestOptions {
                method: Method::PATCH,
                body: Some(encode_body(body)?),
                ..RequestOptions::default()
            },
        )
        .await
    }

    /// DELETE `url`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, url: Url) -> ApiResult<ApiResponse<T>> {
        self.request(
            url,
            RequestOptions {
                method: Method::DELETE,
                ..RequestOptions::default()
            },
        )
        .await
    }
}

fn encode_body<B: Serialize>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|error| ApiError::Decode {
        message: format!("request body could not be encoded: {error}"),
    })
}

/// Merge default headers, caller headers, and the bearer token.
fn request_headers(extra: HeaderMap, token: Option<&str>) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.extend(extra);
    if let Some(token) = token {
        let value =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| ApiError::Decode {
                message: format!("bearer token is not a valid header value: {error}"),
            })?;
        headers.insert(header::AUTHORIZATION, value);
    }
    Ok(headers)
}

async fn execute<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> ApiResult<ApiResponse<T>> {
    let response = builder.send().await.map_err(ApiError::from_transport)?;
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    let body = response.text().await.map_err(ApiError::from_transport)?;

    if !status.is_success() {
        return Err(status_error(status, is_json, &body));
    }

    if is_json {
        serde_json::from_str(&body).map_err(|error| ApiError::Decode {
            message: format!("invalid response envelope: {error}"),
        })
    } else {
        // Non-JSON success bodies are carried through as raw text in the
        // envelope message so callers still receive one shape.
        Ok(ApiResponse {
            code: i64::from(status.as_u16()),
            message: body,
            data: None,
            timestamp: None,
        })
    }
}

/// Map a non-2xx response onto [`ApiError::Status`], preferring the
/// server-supplied envelope message and code when the body carries them.
fn status_error(status: StatusCode, is_json: bool, body: &str) -> ApiError {
    let fallback = format!("HTTP error {}", status.as_u16());
    if is_json {
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<Value>>(body) {
            let message = if envelope.message.is_empty() {
                fallback
            } else {
                envelope.message
            };
            let code = if envelope.code == 0 {
                i64::from(status.as_u16())
            } else {
                envelope.code
            };
            return ApiError::Status {
                status: status.as_u16(),
                code,
                message,
            };
        }
    }
    ApiError::Status {
        status: status.as_u16(),
        code: i64::from(status.as_u16()),
        message: fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
        headers.get(name).and_then(|value| value.to_str().ok())
    }

    #[test]
    fn default_headers_are_json() {
        let headers = request_headers(HeaderMap::new(), None).expect("headers build");
        assert_eq!(
            header_text(&headers, header::CONTENT_TYPE),
            Some("application/json")
        );
        assert_eq!(header_text(&headers, header::ACCEPT), Some("application/json"));
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn bearer_header_is_attached_when_a_token_exists() {
        let headers = request_headers(HeaderMap::new(), Some("abc123")).expect("headers build");
        assert_eq!(
            header_text(&headers, header::AUTHORIZATION),
            Some("Bearer abc123")
        );
    }

    #[test]
    fn caller_headers_override_defaults() {
        let mut extra = HeaderMap::new();
        extra.insert(header::ACCEPT, HeaderValue::from_static("text/csv"));
        let headers = request_headers(extra, None).expect("headers build");
        assert_eq!(header_text(&headers, header::ACCEPT), Some("text/csv"));
    }

    #[rstest]
    #[case::envelope_body(
        true,
        r#"{"code": 404, "message": "not found"}"#,
        404,
        "not found"
    )]
    #[case::empty_envelope_message(true, r#"{"code": 0, "message": ""}"#, 404, "HTTP error 404")]
    #[case::non_json_body(false, "<html>gone</html>", 404, "HTTP error 404")]
    #[case::unparseable_json(true, "{broken", 404, "HTTP error 404")]
    fn maps_status_failures_onto_one_error_shape(
        #[case] is_json: bool,
        #[case] body: &str,
        #[case] expected_code: i64,
        #[case] expected_message: &str,
    ) {
        let error = status_error(StatusCode::NOT_FOUND, is_json, body);
        assert_eq!(error.status(), 404);
        assert_eq!(error.code(), expected_code);
        assert_eq!(error.to_string(), expected_message);
    }
}
