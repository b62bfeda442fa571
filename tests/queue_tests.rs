//! Integration tests for rate-limited dispatch through the client facade.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{config, RecordingTransport};
use serde_json::json;
use shopifapi::clients::TransportFuture;
use shopifapi::{
    HttpError, HttpRequest, HttpResponse, QueueConfig, RateLimitedQueue, Shopifapi, Transport,
};
use tokio::time::Instant;

/// Records when each request started and finished; every request takes
/// `latency`.
struct SlowTransport {
    latency: Duration,
    spans: Mutex<Vec<(String, Instant, Instant)>>,
}

impl SlowTransport {
    fn new(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency,
            spans: Mutex::new(Vec::new()),
        })
    }

    fn spans(&self) -> Vec<(String, Instant, Instant)> {
        self.spans.lock().unwrap().clone()
    }
}

impl Transport for SlowTransport {
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let started = Instant::now();
            tokio::time::sleep(self.latency).await;
            self.spans
                .lock()
                .unwrap()
                .push((request.url.clone(), started, Instant::now()));
            Ok(HttpResponse::new(200, HashMap::new(), json!({})))
        })
    }
}

fn paced_queue(max_in_flight: usize, min_interval: Duration) -> Arc<RateLimitedQueue> {
    RateLimitedQueue::new(QueueConfig {
        max_in_flight,
        min_interval,
    })
    .unwrap()
}

#[tokio::test]
async fn test_requests_start_in_call_order_and_respect_pacing() {
    let interval = Duration::from_millis(100);
    let transport = SlowTransport::new(Duration::from_millis(20));
    let shopify = Shopifapi::with_transport(
        config(),
        paced_queue(2, interval),
        Arc::clone(&transport) as _,
    );

    let pending: Vec<_> = (1..=4)
        .map(|id| shopify.get("products").unwrap().with_id().send(id))
        .collect();
    for future in pending {
        future.await.unwrap();
    }

    let spans = transport.spans();
    let urls: Vec<_> = spans.iter().map(|(url, _, _)| url.clone()).collect();
    assert!(urls[0].ends_with("/products/1.json"));
    assert!(urls[3].ends_with("/products/4.json"));

    for pair in spans.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= interval * 9 / 10);
    }
}

#[tokio::test]
async fn test_concurrency_cap_spans_clients_sharing_a_queue() {
    let queue = paced_queue(2, Duration::from_millis(5));
    let transport = SlowTransport::new(Duration::from_millis(100));
    let first = Shopifapi::with_transport(config(), Arc::clone(&queue), Arc::clone(&transport) as _);
    let second = Shopifapi::with_transport(config(), Arc::clone(&queue), Arc::clone(&transport) as _);

    let mut pending = Vec::new();
    for id in 0..3 {
        pending.push(first.get("orders").unwrap().with_id().send(id));
        pending.push(second.get("pages").unwrap().with_id().send(id));
    }
    for future in pending {
        future.await.unwrap();
    }

    let spans = transport.spans();
    assert_eq!(spans.len(), 6);
    for (_, started, _) in &spans {
        let overlapping = spans
            .iter()
            .filter(|(_, s, e)| s <= started && started < e)
            .count();
        assert!(overlapping <= 2, "{overlapping} requests in flight at once");
    }
}

#[tokio::test]
async fn test_queue_depth_counts_waiting_requests() {
    let transport = SlowTransport::new(Duration::from_millis(10));
    let shopify = Shopifapi::with_transport(
        config(),
        paced_queue(2, Duration::from_millis(100)),
        Arc::clone(&transport) as _,
    );

    let pending: Vec<_> = (0..5)
        .map(|_| shopify.get("shop").unwrap().list().send(()))
        .collect();
    assert_eq!(shopify.queue_depth(), 5);

    // The first request goes out at once; the rest wait for pacing.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(shopify.queue_depth(), 4);

    for future in pending {
        future.await.unwrap();
    }
    assert_eq!(shopify.queue_depth(), 0);
}

#[tokio::test]
async fn test_failed_request_frees_its_slot() {
    let transport = RecordingTransport::new(|request| {
        if request.url.ends_with("/products/1.json") {
            Err(503)
        } else {
            Ok(json!({"product": {"id": 2}}))
        }
    });
    let shopify = Shopifapi::with_transport(
        config(),
        paced_queue(1, Duration::from_millis(1)),
        Arc::clone(&transport) as _,
    );

    let failing = shopify.get("products").unwrap().with_id().send(1);
    let following = shopify.get("products").unwrap().with_id().send(2);

    let error = failing.await.unwrap_err();
    assert!(matches!(error, HttpError::Response(ref e) if e.code == 503));

    let response = tokio::time::timeout(Duration::from_secs(2), following)
        .await
        .expect("second request should not wait on the failed one")
        .unwrap();
    assert_eq!(response["product"]["id"], 2);
    assert_eq!(transport.requests().len(), 2);
}

#[test]
fn test_clients_default_to_one_shared_queue() {
    let a = Shopifapi::new(config());
    let b = Shopifapi::new(config());
    assert!(Arc::ptr_eq(a.queue(), b.queue()));
    assert!(Arc::ptr_eq(a.queue(), &RateLimitedQueue::shared()));
}

#[test]
fn test_requests_enqueued_outside_a_runtime_wait() {
    let queue = paced_queue(2, Duration::from_millis(500));
    let shopify = Shopifapi::with_transport(
        config(),
        Arc::clone(&queue),
        SlowTransport::new(Duration::ZERO) as _,
    );

    drop(shopify.get("shop").unwrap().list().send(()));
    assert_eq!(queue.depth(), 1);
    assert_eq!(queue.in_flight(), 0);
}

#[test]
fn test_future_created_outside_a_runtime_resolves_inside_one() {
    let queue = paced_queue(2, Duration::from_millis(500));
    let shopify = Shopifapi::with_transport(
        config(),
        Arc::clone(&queue),
        RecordingTransport::echo() as _,
    );

    let pending = shopify.remove("product").unwrap().send(3);
    assert_eq!(queue.depth(), 1);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let response = runtime
        .block_on(async { tokio::time::timeout(Duration::from_secs(2), pending).await })
        .expect("request should be dispatched once awaited")
        .unwrap();

    assert_eq!(response["body"], json!({"product": {"id": 3}}));
    assert_eq!(queue.depth(), 0);
}
