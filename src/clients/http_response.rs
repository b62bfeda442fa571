//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type and the parsed
//! [`ApiCallLimit`] header value.

use std::collections::HashMap;

/// Rate limit information parsed from the `X-Shopify-Shop-Api-Call-Limit` header.
///
/// The header format is "X/Y" where X is the current request count and Y is
/// the bucket size.
///
/// # Example
///
/// ```rust
/// use shopifapi::clients::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("40/80").unwrap();
/// assert_eq!(limit.request_count, 40);
/// assert_eq!(limit.bucket_size, 80);
/// assert_eq!(limit.remaining(), 40);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// The current number of requests made in this bucket.
    pub request_count: u32,
    /// The maximum number of requests allowed in this bucket.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses the rate limit header value.
    ///
    /// Returns `None` unless the value is two integers separated by `/`.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (count, size) = header_value.trim().split_once('/')?;

        Some(Self {
            request_count: count.parse().ok()?,
            bucket_size: size.parse().ok()?,
        })
    }

    /// Returns how many calls are left in the bucket.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.bucket_size.saturating_sub(self.request_count)
    }
}

/// An HTTP response from the platform.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lower-cased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
    /// Rate limit information (from `X-Shopify-Shop-Api-Call-Limit` header).
    pub api_call_limit: Option<ApiCallLimit>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the call limit header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let api_call_limit = headers
            .get("x-shopify-shop-api-call-limit")
            .and_then(|values| values.first())
            .and_then(|value| ApiCallLimit::parse(value));

        Self {
            code,
            headers,
            body,
            api_call_limit,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_call_limit_parse() {
        assert_eq!(
            ApiCallLimit::parse("1/40"),
            Some(ApiCallLimit {
                request_count: 1,
                bucket_size: 40
            })
        );
        assert!(ApiCallLimit::parse("garbage").is_none());
        assert!(ApiCallLimit::parse("1/2/3").is_none());
        assert!(ApiCallLimit::parse("a/40").is_none());
    }

    #[test]
    fn test_remaining_saturates() {
        let limit = ApiCallLimit {
            request_count: 45,
            bucket_size: 40,
        };
        assert_eq!(limit.remaining(), 0);
    }

    #[test]
    fn test_response_parses_headers() {
        let mut headers = HashMap::new();
        headers.insert(
            "x-shopify-shop-api-call-limit".to_string(),
            vec!["39/40".to_string()],
        );
        headers.insert("x-request-id".to_string(), vec!["req-1".to_string()]);

        let response = HttpResponse::new(200, headers, json!({"shop": {}}));

        assert!(response.is_ok());
        assert_eq!(response.request_id(), Some("req-1"));
        assert_eq!(response.api_call_limit.unwrap().remaining(), 1);
    }

    #[test]
    fn test_is_ok_bounds() {
        assert!(!HttpResponse::new(199, HashMap::new(), json!({})).is_ok());
        assert!(HttpResponse::new(201, HashMap::new(), json!({})).is_ok());
        assert!(!HttpResponse::new(404, HashMap::new(), json!({})).is_ok());
    }
}
