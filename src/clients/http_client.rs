//! HTTP transport for dispatched requests.
//!
//! This module provides the [`Transport`] seam the dispatch queue calls
//! into, and [`HttpClient`], the reqwest-backed implementation used by
//! default.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Executes request descriptors against the remote platform.
///
/// Implementations must resolve exactly once per request, either with the
/// response or with the error that prevented one. Retries and timeouts, if
/// any, belong to the implementation.
pub trait Transport: Send + Sync {
    /// Sends the request and resolves with the response.
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// reqwest-backed [`Transport`].
///
/// The client handles:
/// - Basic auth from the request's credential pair
/// - JSON `Accept`/`Content-Type` headers and body encoding
/// - Query string encoding for reads
/// - Mapping non-2xx responses to [`HttpError::Response`]
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    user_agent: String,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!("shopifapi v{SDK_VERSION} | Rust {rust_version}");

        Self { client, user_agent }
    }

    /// Returns the User-Agent header sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sends a request descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        req_builder = req_builder
            .header("User-Agent", &self.user_agent)
            .basic_auth(request.auth.username(), Some(request.auth.password()));

        if request.json {
            req_builder = req_builder.header("Accept", "application/json");
        }

        let query = request.query_pairs();
        if !query.is_empty() {
            req_builder = req_builder.query(&query);
        }

        if let Some(body) = &request.body {
            req_builder = if request.json {
                req_builder.json(body)
            } else {
                req_builder.body(body.to_string())
            };
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let body = if body_text.is_empty() {
            serde_json::json!({})
        } else if request.json {
            serde_json::from_str(&body_text).unwrap_or_else(|_| {
                // For 5xx errors, return raw body as string value
                if code >= 500 {
                    serde_json::json!({ "raw_body": body_text })
                } else {
                    serde_json::json!({})
                }
            })
        } else {
            serde_json::Value::String(body_text)
        };

        let response = HttpResponse::new(code, res_headers, body);

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            message: Self::serialize_error(&response),
            error_reference: response.request_id().map(String::from),
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Serializes an error response to a compact JSON message.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        if let Some(errors) = response.body.get("errors") {
            error_body.insert("errors".to_string(), errors.clone());
        }
        if let Some(error) = response.body.get("error") {
            error_body.insert("error".to_string(), error.clone());
            if let Some(desc) = response.body.get("error_description") {
                error_body.insert("error_description".to_string(), desc.clone());
            }
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpClient {
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
        Box::pin(self.request(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_agent_format() {
        let client = HttpClient::new();
        assert!(client.user_agent().starts_with("shopifapi v"));
        assert!(client.user_agent().contains("Rust"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn test_serialize_error_collects_known_fields() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123".to_string()]);
        let response = HttpResponse::new(
            422,
            headers,
            json!({"errors": {"title": ["can't be blank"]}, "ignored": true}),
        );

        let message = HttpClient::serialize_error(&response);
        let parsed: serde_json::Value = serde_json::from_str(&message).unwrap();

        assert_eq!(parsed["errors"]["title"][0], "can't be blank");
        assert!(parsed["error_reference"]
            .as_str()
            .unwrap()
            .contains("abc-123"));
        assert!(parsed.get("ignored").is_none());
    }

    #[test]
    fn test_serialize_error_description_requires_error() {
        let response = HttpResponse::new(
            400,
            HashMap::new(),
            json!({"error_description": "orphan"}),
        );
        assert_eq!(HttpClient::serialize_error(&response), "{}");
    }
}
