//! The client facade.
//!
//! [`Shopifapi`] generates its [`RouteTable`] at construction and exposes it
//! as four verb accessors:
//!
//! | accessor             | HTTP     | shapes                                   |
//! |----------------------|----------|------------------------------------------|
//! | [`Shopifapi::get`]   | `GET`    | `list`, `count`, `with_id`, nested `sub` |
//! | [`Shopifapi::create`]| `POST`   | collection path                          |
//! | [`Shopifapi::update`]| `PUT`    | single-item path                         |
//! | [`Shopifapi::remove`]| `DELETE` | single-item path                         |
//!
//! Unknown resource aliases yield `None`.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopifapi::{ClientConfig, Credentials, Shopifapi, StoreUrl};
//! use serde_json::json;
//!
//! let config = ClientConfig::builder()
//!     .auth(Credentials::new("api-key", "password")?)
//!     .url(StoreUrl::new("https://my-store.myshopify.com")?)
//!     .build()?;
//! let shopify = Shopifapi::new(config);
//!
//! // GET /admin/products/632910392.json
//! let product = shopify.get("products").unwrap().with_id().send(632910392).await?;
//!
//! // GET /admin/orders/450789469/transactions.json
//! let transactions = shopify
//!     .get("orders")
//!     .unwrap()
//!     .sub("transactions")
//!     .unwrap()
//!     .list()
//!     .send(450789469)
//!     .await?;
//!
//! // PUT /admin/products/632910392.json with {"product": {"id": 632910392, "title": "New"}}
//! shopify
//!     .update("products")
//!     .unwrap()
//!     .send_with((632910392, json!({"title": "New"})), |result| {
//!         if let Err(e) = result {
//!             eprintln!("update failed: {e}");
//!         }
//!     });
//! ```

mod endpoint;
mod legacy;

pub use endpoint::{CallArgs, Endpoint, ReadEndpoints, ResponseFuture, VariantEndpoints};
pub use legacy::QueryArgs;

use std::fmt;
use std::sync::Arc;

use crate::clients::{HttpClient, Transport};
use crate::config::ClientConfig;
use crate::log::Log;
use crate::queue::RateLimitedQueue;
use crate::rest::{RouteTable, Verb};

use endpoint::Dispatcher;

/// Client for the Admin REST API.
///
/// # Thread Safety
///
/// `Shopifapi` is `Send + Sync`. Endpoints borrow from it, and every
/// request they issue is owned by the queue once enqueued.
pub struct Shopifapi {
    config: ClientConfig,
    routes: RouteTable,
    dispatcher: Dispatcher,
    log: Log,
}

// Verify Shopifapi is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Shopifapi>();
};

impl Shopifapi {
    /// Creates a client that sends through [`HttpClient`] on the
    /// process-wide [`RateLimitedQueue::shared`] queue.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_queue(config, RateLimitedQueue::shared())
    }

    /// Creates a client that sends through [`HttpClient`] on the given queue.
    #[must_use]
    pub fn with_queue(config: ClientConfig, queue: Arc<RateLimitedQueue>) -> Self {
        Self::with_transport(config, queue, Arc::new(HttpClient::new()))
    }

    /// Creates a client with an explicit queue and transport.
    #[must_use]
    pub fn with_transport(
        config: ClientConfig,
        queue: Arc<RateLimitedQueue>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let routes = RouteTable::standard(config.url().as_ref());
        let log = Log::new(config.verbose(), config.logger().cloned());
        let dispatcher = Dispatcher {
            auth: config.auth().clone(),
            with_response: config.with_response(),
            transport,
            queue,
        };

        tracing::debug!(
            store = config.url().host_name(),
            with_response = config.with_response(),
            "created client"
        );

        Self {
            config,
            routes,
            dispatcher,
            log,
        }
    }

    /// Read endpoints of a resource.
    #[must_use]
    pub fn get(&self, resource: &str) -> Option<ReadEndpoints<'_>> {
        self.routes
            .read(resource)
            .map(|routes| ReadEndpoints::new(routes, &self.dispatcher))
    }

    /// Create endpoint of a resource.
    #[must_use]
    pub fn create(&self, resource: &str) -> Option<Endpoint<'_>> {
        self.write(Verb::Create, resource)
    }

    /// Update endpoint of a resource.
    #[must_use]
    pub fn update(&self, resource: &str) -> Option<Endpoint<'_>> {
        self.write(Verb::Update, resource)
    }

    /// Remove endpoint of a resource.
    #[must_use]
    pub fn remove(&self, resource: &str) -> Option<Endpoint<'_>> {
        self.write(Verb::Remove, resource)
    }

    /// Write endpoint of a resource for any write verb.
    #[must_use]
    pub fn write(&self, verb: Verb, resource: &str) -> Option<Endpoint<'_>> {
        self.routes
            .write(verb, resource)
            .map(|route| Endpoint::new(route, verb, &self.dispatcher))
    }

    /// Returns the generated route table.
    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the construction options.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the logging collaborator.
    #[must_use]
    pub const fn log(&self) -> &Log {
        &self.log
    }

    /// Returns the number of requests waiting in this client's queue.
    ///
    /// With the shared queue this counts requests from every client in the
    /// process.
    #[must_use]
    pub fn queue_depth(&self) -> usize {
        self.dispatcher.queue.depth()
    }

    /// Returns the queue this client dispatches through.
    #[must_use]
    pub const fn queue(&self) -> &Arc<RateLimitedQueue> {
        &self.dispatcher.queue
    }
}

impl fmt::Debug for Shopifapi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shopifapi")
            .field("config", &self.config)
            .field("base", &self.routes.base())
            .field("queue", &self.dispatcher.queue)
            .finish_non_exhaustive()
    }
}
