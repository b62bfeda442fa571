//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use shopifapi::clients::TransportFuture;
use shopifapi::{
    ClientConfig, Credentials, HttpError, HttpRequest, HttpResponse, HttpResponseError,
    QueueConfig, RateLimitedQueue, Shopifapi, StoreUrl, Transport,
};

pub const STORE: &str = "https://test-shop.myshopify.com";

type Responder = dyn Fn(&HttpRequest) -> Result<Value, u16> + Send + Sync;

/// A transport that records every request and answers from a closure.
///
/// The closure returns the body for a 200, or a status code to fail with.
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    respond: Box<Responder>,
}

impl RecordingTransport {
    pub fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<Value, u16> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Echoes the URL and body of every request.
    pub fn echo() -> Arc<Self> {
        Self::new(|request| Ok(json!({"url": request.url, "body": request.body})))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
        let outcome = (self.respond)(&request);
        self.requests.lock().unwrap().push(request);

        Box::pin(async move {
            match outcome {
                Ok(body) => {
                    let mut headers = HashMap::new();
                    headers.insert(
                        "x-shopify-shop-api-call-limit".to_string(),
                        vec!["1/40".to_string()],
                    );
                    Ok(HttpResponse::new(200, headers, body))
                }
                Err(code) => Err(HttpError::Response(HttpResponseError {
                    code,
                    message: format!(r#"{{"errors":"status {code}"}}"#),
                    error_reference: None,
                })),
            }
        })
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::builder()
        .auth(Credentials::new("api-key", "hunter2").unwrap())
        .url(StoreUrl::new(STORE).unwrap())
        .build()
        .unwrap()
}

pub fn fast_queue() -> Arc<RateLimitedQueue> {
    RateLimitedQueue::new(QueueConfig {
        max_in_flight: 2,
        min_interval: std::time::Duration::from_millis(1),
    })
    .unwrap()
}

pub fn client_with(config: ClientConfig, transport: Arc<RecordingTransport>) -> Shopifapi {
    Shopifapi::with_transport(config, fast_queue(), transport)
}
