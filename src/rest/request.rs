//! Request descriptor construction.
//!
//! Turns a [`Route`], a verb, and a [`CanonicalCall`]'s identifiers and
//! options into an [`HttpRequest`]:
//!
//! - reads put the options in the query and carry no body
//! - writes wrap the options under the singular resource key, with the
//!   identifier merged in as `id`

use serde_json::{Map, Value};

use crate::clients::{HttpMethod, HttpRequest, InvalidHttpRequestError};
use crate::config::Credentials;
use crate::rest::path::{Identifier, Route};

/// Strips one trailing `s`.
///
/// Irregular plurals are not special-cased: `countries` becomes `countrie`.
///
/// ```rust
/// use shopifapi::rest::singularize;
///
/// assert_eq!(singularize("products"), "product");
/// assert_eq!(singularize("custom_collections"), "custom_collection");
/// assert_eq!(singularize("shop"), "shop");
/// ```
#[must_use]
pub fn singularize(resource: &str) -> &str {
    resource.strip_suffix('s').unwrap_or(resource)
}

/// Builds the write body for a route.
///
/// # Example
///
/// ```rust
/// use shopifapi::rest::{write_body, Identifier};
/// use serde_json::json;
///
/// let options = json!({"title": "y"}).as_object().unwrap().clone();
/// let body = write_body(Some("products"), &[Identifier::from(7)], options);
///
/// assert_eq!(body, json!({"product": {"id": 7, "title": "y"}}));
/// ```
#[must_use]
pub fn write_body(
    resource_key: Option<&str>,
    ids: &[Identifier],
    mut options: Map<String, Value>,
) -> Value {
    match ids {
        [] => {}
        [id] => {
            options.insert("id".to_string(), id.to_value());
        }
        many => {
            options.insert(
                "id".to_string(),
                Value::Array(many.iter().map(Identifier::to_value).collect()),
            );
        }
    }

    match resource_key.map(singularize).filter(|key| !key.is_empty()) {
        Some(key) => {
            let mut wrapped = Map::new();
            wrapped.insert(key.to_string(), Value::Object(options));
            Value::Object(wrapped)
        }
        None => Value::Object(options),
    }
}

/// Builds the request descriptor for one route call.
///
/// # Errors
///
/// Returns [`InvalidHttpRequestError`] if the resulting descriptor fails
/// validation.
pub fn build_request(
    route: &Route,
    method: HttpMethod,
    ids: &[Identifier],
    options: Map<String, Value>,
    auth: &Credentials,
) -> Result<HttpRequest, InvalidHttpRequestError> {
    let builder = HttpRequest::builder(method, route.path(ids), auth.clone());

    let builder = if method.is_read() {
        builder.query(options)
    } else {
        builder.body(write_body(route.resource_key(), ids, options))
    };

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://shop.myshopify.com/admin";

    fn auth() -> Credentials {
        Credentials::new("key", "secret").unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_create_wraps_under_singular_key() {
        let route = Route::new(BASE, "products.json", Some("products".to_string()));
        let request = build_request(
            &route,
            HttpMethod::Post,
            &[],
            object(json!({"title": "x"})),
            &auth(),
        )
        .unwrap();

        assert_eq!(request.url, format!("{BASE}/products.json"));
        assert_eq!(request.body, Some(json!({"product": {"title": "x"}})));
        assert!(request.query.is_none());
    }

    #[test]
    fn test_update_merges_identifier() {
        let route = Route::new(BASE, "products/?.json", Some("products".to_string()));
        let request = build_request(
            &route,
            HttpMethod::Put,
            &[Identifier::from(7)],
            object(json!({"title": "y"})),
            &auth(),
        )
        .unwrap();

        assert_eq!(request.url, format!("{BASE}/products/7.json"));
        assert_eq!(request.body, Some(json!({"product": {"id": 7, "title": "y"}})));
    }

    #[test]
    fn test_remove_with_identifier_only() {
        let route = Route::new(BASE, "orders/?.json", Some("orders".to_string()));
        let request = build_request(
            &route,
            HttpMethod::Delete,
            &[Identifier::from(3)],
            Map::new(),
            &auth(),
        )
        .unwrap();

        assert_eq!(request.http_method, HttpMethod::Delete);
        assert_eq!(request.body, Some(json!({"order": {"id": 3}})));
    }

    #[test]
    fn test_empty_write_body() {
        assert_eq!(write_body(Some("pages"), &[], Map::new()), json!({"page": {}}));
        assert_eq!(write_body(None, &[], Map::new()), json!({}));
    }

    #[test]
    fn test_multiple_identifiers_written_as_array() {
        let body = write_body(
            Some("variants"),
            &[Identifier::from(1), Identifier::from(2)],
            Map::new(),
        );
        assert_eq!(body, json!({"variant": {"id": [1, 2]}}));
    }

    #[test]
    fn test_read_carries_options_as_query() {
        let route = Route::new(BASE, "products/?.json", None);
        let request = build_request(
            &route,
            HttpMethod::Get,
            &[Identifier::from(7)],
            Map::new(),
            &auth(),
        )
        .unwrap();

        assert_eq!(request.url, format!("{BASE}/products/7.json"));
        assert_eq!(request.query, Some(Map::new()));
        assert!(request.body.is_none());
        assert!(request.query_pairs().is_empty());
    }

    #[test]
    fn test_read_query_from_options() {
        let route = Route::new(BASE, "orders.json", None);
        let request = build_request(
            &route,
            HttpMethod::Get,
            &[],
            object(json!({"status": "any", "limit": 50})),
            &auth(),
        )
        .unwrap();

        let mut pairs = request.query_pairs();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("status".to_string(), "any".to_string()),
            ]
        );
    }

    #[test]
    fn test_singularize_is_naive() {
        assert_eq!(singularize("countries"), "countrie");
        assert_eq!(singularize(""), "");
    }
}
