//! # shopifapi
//!
//! A client for the Shopify Admin REST API whose methods are generated from
//! a resource taxonomy, with every request funnelled through a shared
//! rate-limited queue.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe construction options via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Route functions for every resource, verb, and path shape via [`rest::RouteTable`]
//! - A loose calling convention normalized by [`rest::normalize`]
//! - A FIFO dispatch queue capping concurrency and pacing ([`RateLimitedQueue`])
//! - A pluggable [`Transport`] with a reqwest-backed default ([`HttpClient`])
//! - Deprecated per-method accessors kept for older callers
//!
//! ## Quick Start
//!
//! ```rust
//! use shopifapi::{ClientConfig, Credentials, StoreUrl};
//!
//! let config = ClientConfig::builder()
//!     .auth(Credentials::new("api-key", "password").unwrap())
//!     .url(StoreUrl::new("https://my-store.myshopify.com").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use shopifapi::Shopifapi;
//! use serde_json::json;
//!
//! let shopify = Shopifapi::new(config);
//!
//! // GET /admin/products.json?limit=5
//! let products = shopify.get("products").unwrap().list().send(json!({"limit": 5})).await?;
//!
//! // GET /admin/products/7/images.json
//! let images = shopify.get("product").unwrap().sub("images").unwrap().list().send(7).await?;
//!
//! // POST /admin/orders.json with {"order": {"email": "a@b.c"}}
//! let created = shopify.create("orders").unwrap().send(json!({"email": "a@b.c"})).await?;
//!
//! // DELETE /admin/pages/9.json
//! shopify.remove("page").unwrap().send(9).await?;
//!
//! // Requests waiting in the queue
//! println!("{}", shopify.queue_depth());
//! ```
//!
//! ## Design Principles
//!
//! - **One queue per process by default**: clients share [`RateLimitedQueue::shared`]
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **No retries**: failures reach the completion unchanged

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod log;
pub mod queue;
pub mod rest;

pub use client::{
    CallArgs, Endpoint, QueryArgs, ReadEndpoints, ResponseFuture, Shopifapi, VariantEndpoints,
};
pub use config::{ClientConfig, ClientConfigBuilder, Credentials, StoreUrl};
pub use error::ConfigError;
pub use log::{Log, LogFn};
pub use queue::{QueueConfig, RateLimitedQueue};

// Re-export HTTP client types
pub use clients::{
    ApiCallLimit, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, HttpResponseError, InvalidHttpRequestError, Transport, TransportFuture,
};

// Re-export route types
pub use rest::{CallArg, Callback, Identifier, PathVariant, RouteResponse, RouteTable, Verb};
