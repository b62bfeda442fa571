//! Transport-ready request descriptors.
//!
//! This module provides the [`HttpRequest`] type and its builder. A request
//! carries everything the transport needs: the final URL, the method, query
//! parameters for reads, a JSON body for writes, and the credential pair.

use std::fmt;

use serde_json::{Map, Value};

use crate::clients::errors::InvalidHttpRequestError;
use crate::config::Credentials;

/// HTTP methods supported by the Admin REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method token sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` for methods that read rather than write.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A request descriptor handed to a [`Transport`](crate::clients::Transport).
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use shopifapi::clients::{HttpMethod, HttpRequest};
/// use shopifapi::Credentials;
/// use serde_json::json;
///
/// let auth = Credentials::new("key", "password").unwrap();
///
/// let request = HttpRequest::builder(
///     HttpMethod::Post,
///     "https://shop.myshopify.com/admin/products.json",
///     auth,
/// )
/// .body(json!({"product": {"title": "New Product"}}))
/// .build()
/// .unwrap();
///
/// assert!(request.json);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The fully-formed URL.
    pub url: String,
    /// Query parameters, present for reads.
    pub query: Option<Map<String, Value>>,
    /// The request body, present for writes.
    pub body: Option<Value>,
    /// Basic-auth credential pair.
    pub auth: Credentials,
    /// Whether bodies are encoded and decoded as JSON.
    pub json: bool,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(
        method: HttpMethod,
        url: impl Into<String>,
        auth: Credentials,
    ) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url, auth)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `url` is empty
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.url.is_empty() {
            return Err(InvalidHttpRequestError::EmptyUrl);
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }

    /// Flattens the query object into string pairs.
    ///
    /// Scalars are rendered as-is, arrays are comma-joined (the form the
    /// API accepts for `ids` and `fields`), nested objects are JSON-encoded
    /// and nulls are dropped.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = &self.query else {
            return Vec::new();
        };

        query
            .iter()
            .filter_map(|(key, value)| query_value(value).map(|v| (key.clone(), v)))
            .collect()
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    url: String,
    query: Option<Map<String, Value>>,
    body: Option<Value>,
    auth: Credentials,
    json: bool,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>, auth: Credentials) -> Self {
        Self {
            http_method: method,
            url: url.into(),
            query: None,
            body: None,
            auth,
            json: true,
        }
    }

    /// Sets the query object.
    #[must_use]
    pub fn query(mut self, query: Map<String, Value>) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            url: self.url,
            query: self.query,
            body: self.body,
            auth: self.auth,
            json: self.json,
        };
        request.verify()?;
        Ok(request)
    }
}
