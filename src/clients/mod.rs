//! HTTP layer: request descriptors, responses, and the transport seam.
//!
//! # Overview
//!
//! - [`HttpRequest`]: a transport-ready request descriptor
//! - [`HttpResponse`]: a parsed response
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`Transport`]: the seam the dispatch queue calls into
//! - [`HttpClient`]: the reqwest-backed [`Transport`]
//! - [`HttpError`]: the error delivered to completions
//!
//! # Example
//!
//! ```rust,ignore
//! use shopifapi::clients::{HttpClient, HttpMethod, HttpRequest};
//! use shopifapi::Credentials;
//!
//! let client = HttpClient::new();
//! let request = HttpRequest::builder(
//!     HttpMethod::Get,
//!     "https://my-store.myshopify.com/admin/shop.json",
//!     Credentials::new("key", "password")?,
//! )
//! .build()?;
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! None. A failed request surfaces its error to the caller unchanged.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, Transport, TransportFuture, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiCallLimit, HttpResponse};
