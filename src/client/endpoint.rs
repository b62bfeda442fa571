//! Callable route endpoints.
//!
//! An [`Endpoint`] pairs one route with the client's dispatcher. Calling it
//! normalizes the arguments, builds the request descriptor immediately, and
//! enqueues the transport call on the rate-limited queue. The completion is
//! delivered through a [`ResponseFuture`] or a callback.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::clients::{HttpError, HttpRequest, HttpResponse, Transport};
use crate::config::Credentials;
use crate::queue::RateLimitedQueue;
use crate::rest::{
    build_request, normalize, CallArg, CanonicalCall, Identifier, PathVariant, ReadRoutes, Route,
    RouteResponse, VariantRoutes, Verb,
};

/// Shared state every endpoint of a client dispatches through.
pub(crate) struct Dispatcher {
    pub(crate) auth: Credentials,
    pub(crate) with_response: bool,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) queue: Arc<RateLimitedQueue>,
}

impl Dispatcher {
    /// Normalizes a route call and enqueues it.
    pub(crate) fn dispatch(&self, route: &Route, verb: Verb, args: Vec<CallArg>) {
        let CanonicalCall {
            ids,
            options,
            callback,
        } = normalize(args);

        let request = match build_request(route, verb.http_method(), &ids, options, &self.auth) {
            Ok(request) => request,
            Err(e) => {
                callback.invoke(Err(e.into()));
                return;
            }
        };

        let with_response = self.with_response;
        self.submit(request, move |result| {
            callback.invoke(result.map(|response| RouteResponse::from_http(response, with_response)));
        });
    }

    /// Enqueues a prepared request; `on_done` receives the transport result.
    pub(crate) fn submit<F>(&self, request: HttpRequest, on_done: F)
    where
        F: FnOnce(Result<HttpResponse, HttpError>) + Send + 'static,
    {
        tracing::debug!(
            method = request.http_method.as_str(),
            url = %request.url,
            "enqueueing request"
        );

        let transport = Arc::clone(&self.transport);
        self.queue.enqueue(move || async move {
            let result = transport.execute(request).await;
            on_done(result);
        });
    }
}

/// Positional arguments for a typed route call.
///
/// Converts from the common call shapes so endpoints can be called without
/// building [`CallArg`] vectors by hand:
///
/// | value                  | meaning                               |
/// |------------------------|---------------------------------------|
/// | `()`                   | no identifier, no options             |
/// | integer or string      | identifier                            |
/// | `Vec` of integers      | identifiers for nested placeholders   |
/// | `serde_json::Value`    | options (an `id` field is consumed)   |
/// | `(id, Value)`          | identifier plus options               |
#[derive(Debug, Default)]
pub struct CallArgs(Vec<CallArg>);

impl CallArgs {
    /// Returns the positional arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<CallArg> {
        self.0
    }
}

impl From<()> for CallArgs {
    fn from((): ()) -> Self {
        Self::default()
    }
}

impl From<Value> for CallArgs {
    fn from(options: Value) -> Self {
        Self(vec![CallArg::Value(options)])
    }
}

impl From<Identifier> for CallArgs {
    fn from(id: Identifier) -> Self {
        Self(vec![CallArg::Value(id.to_value())])
    }
}

impl From<Vec<Identifier>> for CallArgs {
    fn from(ids: Vec<Identifier>) -> Self {
        let ids = ids.iter().map(Identifier::to_value).collect();
        Self(vec![CallArg::Value(Value::Array(ids))])
    }
}

impl From<&str> for CallArgs {
    fn from(id: &str) -> Self {
        Identifier::from(id).into()
    }
}

impl From<String> for CallArgs {
    fn from(id: String) -> Self {
        Identifier::from(id).into()
    }
}

impl<I: Into<Identifier>> From<(I, Value)> for CallArgs {
    fn from((id, options): (I, Value)) -> Self {
        Self(vec![
            CallArg::Value(id.into().to_value()),
            CallArg::Value(options),
        ])
    }
}

macro_rules! call_args_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CallArgs {
                fn from(id: $t) -> Self {
                    Identifier::from(id).into()
                }
            }

            impl From<Vec<$t>> for CallArgs {
                fn from(ids: Vec<$t>) -> Self {
                    ids.into_iter().map(Identifier::from).collect::<Vec<_>>().into()
                }
            }
        )*
    };
}

call_args_from_int!(i32, i64, u32, u64, usize);

/// Awaitable completion of a route call.
///
/// The request is already queued when this future is created; dropping it
/// does not cancel the request. A future created outside a Tokio runtime
/// starts the queue's dispatch when it is first polled inside one.
#[derive(Debug)]
#[must_use = "the request is sent regardless; await the future to observe its result"]
pub struct ResponseFuture {
    rx: oneshot::Receiver<Result<RouteResponse, HttpError>>,
    queue: Option<Arc<RateLimitedQueue>>,
}

impl Future for ResponseFuture {
    type Output = Result<RouteResponse, HttpError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(queue) = self.queue.take() {
            queue.dispatch_pending();
        }
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(HttpError::Dropped)))
    }
}

/// One callable route: a verb bound to a route function.
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    route: &'a Route,
    verb: Verb,
    dispatcher: &'a Dispatcher,
}

impl<'a> Endpoint<'a> {
    pub(crate) const fn new(route: &'a Route, verb: Verb, dispatcher: &'a Dispatcher) -> Self {
        Self {
            route,
            verb,
            dispatcher,
        }
    }

    /// Returns the route function behind this endpoint.
    #[must_use]
    pub const fn route(&self) -> &'a Route {
        self.route
    }

    /// Returns the verb this endpoint issues.
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// Returns the URL for the given identifiers.
    #[must_use]
    pub fn url(&self, ids: &[Identifier]) -> String {
        self.route.path(ids)
    }

    /// Raw variadic entry point.
    ///
    /// The arguments are normalized as `(id, options, callback)` and the
    /// request is enqueued before this returns. Without a callback argument
    /// the result is discarded.
    pub fn call(&self, args: Vec<CallArg>) {
        self.dispatcher.dispatch(self.route, self.verb, args);
    }

    /// Enqueues the call and returns a future for its result.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let product = client.get("products").unwrap().with_id().send(632910392).await?;
    /// let created = client
    ///     .create("products")
    ///     .unwrap()
    ///     .send(json!({"title": "Burton Custom Freestyle 151"}))
    ///     .await?;
    /// ```
    pub fn send(&self, args: impl Into<CallArgs>) -> ResponseFuture {
        let (tx, rx) = oneshot::channel();
        let mut args = args.into().into_args();
        args.push(CallArg::callback(move |result| {
            let _ = tx.send(result);
        }));
        self.call(args);
        ResponseFuture {
            rx,
            queue: Some(Arc::clone(&self.dispatcher.queue)),
        }
    }

    /// Enqueues the call; `callback` runs exactly once with the result.
    pub fn send_with<F>(&self, args: impl Into<CallArgs>, callback: F)
    where
        F: FnOnce(Result<RouteResponse, HttpError>) + Send + 'static,
    {
        let mut args = args.into().into_args();
        args.push(CallArg::callback(callback));
        self.call(args);
    }

    /// Builds the request descriptor this call would send, without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the descriptor fails
    /// validation.
    pub fn prepare(&self, args: impl Into<CallArgs>) -> Result<HttpRequest, HttpError> {
        let call = normalize(args.into().into_args());
        Ok(build_request(
            self.route,
            self.verb.http_method(),
            &call.ids,
            call.options,
            &self.dispatcher.auth,
        )?)
    }
}

impl std::fmt::Debug for Endpoint<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("verb", &self.verb)
            .field("route", &self.route.template())
            .finish()
    }
}

/// The three read shapes of one resource or nested resource.
#[derive(Clone, Copy)]
pub struct VariantEndpoints<'a> {
    routes: &'a VariantRoutes,
    dispatcher: &'a Dispatcher,
}

impl<'a> VariantEndpoints<'a> {
    pub(crate) const fn new(routes: &'a VariantRoutes, dispatcher: &'a Dispatcher) -> Self {
        Self { routes, dispatcher }
    }

    /// The collection endpoint.
    #[must_use]
    pub const fn list(&self) -> Endpoint<'a> {
        self.variant(PathVariant::List)
    }

    /// The count endpoint.
    #[must_use]
    pub const fn count(&self) -> Endpoint<'a> {
        self.variant(PathVariant::Count)
    }

    /// The single-item endpoint.
    #[must_use]
    pub const fn with_id(&self) -> Endpoint<'a> {
        self.variant(PathVariant::WithId)
    }

    /// The endpoint for a shape.
    #[must_use]
    pub const fn variant(&self, variant: PathVariant) -> Endpoint<'a> {
        Endpoint::new(self.routes.variant(variant), Verb::Get, self.dispatcher)
    }
}

impl std::fmt::Debug for VariantEndpoints<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantEndpoints")
            .field("list", &self.routes.list.template())
            .finish_non_exhaustive()
    }
}

/// Read endpoints of one resource, including its nested resources.
#[derive(Clone, Copy)]
pub struct ReadEndpoints<'a> {
    routes: &'a ReadRoutes,
    dispatcher: &'a Dispatcher,
}

impl<'a> ReadEndpoints<'a> {
    pub(crate) const fn new(routes: &'a ReadRoutes, dispatcher: &'a Dispatcher) -> Self {
        Self { routes, dispatcher }
    }

    /// The collection endpoint.
    #[must_use]
    pub const fn list(&self) -> Endpoint<'a> {
        self.own().list()
    }

    /// The count endpoint.
    #[must_use]
    pub const fn count(&self) -> Endpoint<'a> {
        self.own().count()
    }

    /// The single-item endpoint.
    #[must_use]
    pub const fn with_id(&self) -> Endpoint<'a> {
        self.own().with_id()
    }

    /// The endpoint for a shape.
    #[must_use]
    pub const fn variant(&self, variant: PathVariant) -> Endpoint<'a> {
        self.own().variant(variant)
    }

    /// Endpoints of a nested resource, e.g. `variants` under `products`.
    ///
    /// Nested paths take the parent identifier first:
    /// `sub("variants")?.with_id().send(vec![parent_id, variant_id])`.
    #[must_use]
    pub fn sub(&self, alias: &str) -> Option<VariantEndpoints<'a>> {
        self.routes
            .sub(alias)
            .map(|routes| VariantEndpoints::new(routes, self.dispatcher))
    }

    /// Iterates the aliases of nested resources.
    pub fn sub_resources(&self) -> impl Iterator<Item = &'a str> {
        self.routes.sub_resources.keys().map(String::as_str)
    }

    const fn own(&self) -> VariantEndpoints<'a> {
        VariantEndpoints::new(&self.routes.routes, self.dispatcher)
    }
}

impl std::fmt::Debug for ReadEndpoints<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadEndpoints")
            .field("list", &self.routes.routes.list.template())
            .field(
                "sub_resources",
                &self.routes.sub_resources.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}
