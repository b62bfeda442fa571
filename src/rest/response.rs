//! Completion payload for route calls.
//!
//! [`RouteResponse`] carries the decoded body and, when the client was
//! built with `with_response(true)`, the raw [`HttpResponse`]. It derefs to
//! the body so the common case reads like plain JSON access:
//!
//! ```rust
//! use shopifapi::rest::RouteResponse;
//! use serde_json::json;
//!
//! let response = RouteResponse::new(json!({"product": {"id": 7}}), None);
//! assert_eq!(response["product"]["id"], 7);
//! assert!(response.raw().is_none());
//! ```

use std::ops::Deref;

use serde_json::Value;

use crate::clients::{ApiCallLimit, HttpResponse};

/// Result delivered to a route call's completion.
#[derive(Clone, Debug)]
pub struct RouteResponse {
    /// The decoded response body.
    pub body: Value,
    /// The raw response, present only in `with_response` mode.
    pub response: Option<HttpResponse>,
}

impl RouteResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(body: Value, response: Option<HttpResponse>) -> Self {
        Self { body, response }
    }

    /// Splits a transport response according to the `with_response` mode.
    #[must_use]
    pub fn from_http(response: HttpResponse, with_response: bool) -> Self {
        if with_response {
            Self::new(response.body.clone(), Some(response))
        } else {
            Self::new(response.body, None)
        }
    }

    /// Returns the raw response, if it was kept.
    #[must_use]
    pub const fn raw(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Returns the call-limit header of the raw response, if it was kept.
    #[must_use]
    pub fn api_call_limit(&self) -> Option<ApiCallLimit> {
        self.response.as_ref().and_then(|r| r.api_call_limit)
    }

    /// Consumes the response, returning the body.
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }
}

impl Deref for RouteResponse {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn http_response() -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert(
            "x-shopify-shop-api-call-limit".to_string(),
            vec!["3/40".to_string()],
        );
        HttpResponse::new(200, headers, json!({"shop": {"name": "Test"}}))
    }

    #[test]
    fn test_from_http_without_response_drops_raw() {
        let response = RouteResponse::from_http(http_response(), false);
        assert_eq!(response.body["shop"]["name"], "Test");
        assert!(response.raw().is_none());
        assert!(response.api_call_limit().is_none());
    }

    #[test]
    fn test_from_http_with_response_keeps_raw() {
        let response = RouteResponse::from_http(http_response(), true);
        assert_eq!(response.raw().unwrap().code, 200);
        assert_eq!(response.api_call_limit().unwrap().request_count, 3);
        assert_eq!(response["shop"]["name"], "Test");
    }

    #[test]
    fn test_into_body() {
        let response = RouteResponse::new(json!([1, 2]), None);
        assert_eq!(response.into_body(), json!([1, 2]));
    }
}
