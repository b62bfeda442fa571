//! Route generation for the Admin REST API.
//!
//! This module turns a resource taxonomy into callable routes:
//!
//! - **[`ResourceCatalog`] / [`SubResourceCatalog`]**: alias-to-segment maps
//! - **[`Route`]**: a path template with `?` identifier placeholders
//! - **[`RouteTable`]**: route functions for every verb and resource
//! - **[`normalize`]**: reduces a loose argument list to a [`CanonicalCall`]
//! - **[`build_request`]**: turns a route plus a canonical call into an
//!   [`HttpRequest`](crate::clients::HttpRequest)
//!
//! # Example
//!
//! ```rust
//! use shopifapi::clients::HttpMethod;
//! use shopifapi::rest::{build_request, normalize, CallArg, RouteTable, Verb};
//! use shopifapi::Credentials;
//! use serde_json::json;
//!
//! let table = RouteTable::standard("https://shop.myshopify.com");
//! let route = table.write(Verb::Update, "products").unwrap();
//!
//! let call = normalize(vec![
//!     CallArg::Value(json!(7)),
//!     CallArg::Value(json!({"title": "Renamed"})),
//! ]);
//!
//! let auth = Credentials::new("key", "password").unwrap();
//! let request = build_request(route, HttpMethod::Put, &call.ids, call.options, &auth).unwrap();
//!
//! assert_eq!(request.url, "https://shop.myshopify.com/admin/products/7.json");
//! assert_eq!(request.body, Some(json!({"product": {"id": 7, "title": "Renamed"}})));
//! ```

mod catalog;
mod normalize;
mod path;
mod request;
mod response;
mod routes;

pub use catalog::{ResourceCatalog, SubResourceCatalog, BASE_RESOURCES, SUB_RESOURCES};
pub use normalize::{normalize, CallArg, Callback, CanonicalCall};
pub use path::{join, Identifier, PathVariant, Route, PLACEHOLDER};
pub use request::{build_request, singularize, write_body};
pub use response::RouteResponse;
pub use routes::{ReadRoutes, RouteTable, VariantRoutes, Verb, ADMIN_PREFIX};
