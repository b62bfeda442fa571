//! Rate-limited FIFO dispatch queue.
//!
//! Every request issued by a client passes through one [`RateLimitedQueue`].
//! The queue enforces two independent caps:
//!
//! - **Concurrency**: at most `max_in_flight` tasks run at once, enforced
//!   with a Tokio [`Semaphore`] whose permit each running task holds
//! - **Pacing**: consecutive dispatches are at least `min_interval` apart,
//!   enforced with a `governor` rate limiter allowing a burst of one
//!
//! Tasks start in the order they were enqueued. They may complete in any
//! order, since each one awaits its own network call.
//!
//! # Sharing
//!
//! [`RateLimitedQueue::shared`] returns the process-wide default instance.
//! Clients built with [`Shopifapi::new`](crate::Shopifapi::new) all draw
//! from it, so the caps bound the total traffic of the process rather than
//! of a single client. Pass an explicit queue to
//! [`Shopifapi::with_queue`](crate::Shopifapi::with_queue) to isolate a
//! client.
//!
//! # Runtime
//!
//! A single drain task pops the backlog. It is spawned onto the ambient
//! Tokio runtime when work arrives and exits once the backlog is empty.
//! Tasks enqueued outside a runtime wait in the backlog until
//! [`RateLimitedQueue::dispatch_pending`] runs inside one; awaiting a
//! [`ResponseFuture`](crate::ResponseFuture) does this on its first poll.
//!
//! # Example
//!
//! ```rust
//! use shopifapi::queue::{QueueConfig, RateLimitedQueue};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let queue = RateLimitedQueue::new(QueueConfig {
//!     max_in_flight: 2,
//!     min_interval: Duration::from_millis(500),
//! })
//! .unwrap();
//!
//! let (tx, rx) = tokio::sync::oneshot::channel();
//! queue.enqueue(move || async move {
//!     let _ = tx.send("done");
//! });
//! assert_eq!(rx.await.unwrap(), "done");
//! # }
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

use crate::error::ConfigError;

/// Default concurrency cap.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 2;

/// Default spacing between dispatches (two per second, the REST leak rate).
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Task = Box<dyn FnOnce() -> TaskFuture + Send>;
type Pacer = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

static SHARED: OnceLock<Arc<RateLimitedQueue>> = OnceLock::new();

/// The two rate limit knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of dispatched tasks that have not yet completed.
    pub max_in_flight: usize,
    /// Minimum time between two consecutive dispatches. Zero disables pacing.
    pub min_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

#[derive(Default)]
struct Backlog {
    tasks: VecDeque<Task>,
    draining: bool,
}

/// A FIFO task queue with a concurrency cap and a pacing cap.
///
/// # Thread Safety
///
/// The backlog lives behind a mutex that is only held to push, pop, or
/// inspect it, never across an await point.
pub struct RateLimitedQueue {
    config: QueueConfig,
    backlog: Mutex<Backlog>,
    permits: Arc<Semaphore>,
    pacer: Option<Pacer>,
}

// Verify RateLimitedQueue is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RateLimitedQueue>();
};

impl RateLimitedQueue {
    /// Creates a queue with its own backlog and caps.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if `max_in_flight` is zero
    /// or exceeds what a semaphore can hold.
    pub fn new(config: QueueConfig) -> Result<Arc<Self>, ConfigError> {
        if config.max_in_flight == 0 {
            return Err(ConfigError::InvalidRateLimit {
                reason: "max_in_flight must be at least 1".to_string(),
            });
        }
        if config.max_in_flight > Semaphore::MAX_PERMITS {
            return Err(ConfigError::InvalidRateLimit {
                reason: format!("max_in_flight must be at most {}", Semaphore::MAX_PERMITS),
            });
        }
        Ok(Arc::new(Self::from_config(config)))
    }

    /// Returns the process-wide queue, created with [`QueueConfig::default`]
    /// on first use.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::from_config(QueueConfig::default()))))
    }

    fn from_config(config: QueueConfig) -> Self {
        let pacer = Quota::with_period(config.min_interval)
            .map(|quota| RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN)));
        Self {
            config,
            backlog: Mutex::new(Backlog::default()),
            permits: Arc::new(Semaphore::new(config.max_in_flight)),
            pacer,
        }
    }

    /// Returns the caps this queue enforces.
    #[must_use]
    pub const fn config(&self) -> QueueConfig {
        self.config
    }

    /// Appends a task to the backlog and returns immediately.
    ///
    /// The closure runs when the task is dispatched; the future it returns
    /// holds an in-flight slot until it completes.
    pub fn enqueue<F, Fut>(self: &Arc<Self>, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task: Task = Box::new(move || Box::pin(task()));
        self.lock().tasks.push_back(task);
        self.dispatch_pending();
    }

    /// Starts draining the backlog on the current Tokio runtime.
    ///
    /// Does nothing outside a runtime, when the backlog is empty, or when a
    /// drain task is already running.
    pub fn dispatch_pending(self: &Arc<Self>) {
        let Ok(handle) = Handle::try_current() else {
            return;
        };
        {
            let mut backlog = self.lock();
            if backlog.draining || backlog.tasks.is_empty() {
                return;
            }
            backlog.draining = true;
        }

        let drain = Drain {
            queue: Arc::clone(self),
            finished: false,
        };
        handle.spawn(drain.run());
    }

    /// Returns the number of tasks waiting in the backlog.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Returns the number of in-flight slots currently taken.
    ///
    /// This includes the slot the drain task reserves while it waits to
    /// dispatch the next task.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.config
            .max_in_flight
            .saturating_sub(self.permits.available_permits())
    }

    fn lock(&self) -> MutexGuard<'_, Backlog> {
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RateLimitedQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitedQueue")
            .field("config", &self.config)
            .field("depth", &self.depth())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

/// The single task popping a queue's backlog.
///
/// Dropping it before the backlog drains (e.g. on runtime shutdown) clears
/// the draining flag so a later call can start a new one.
struct Drain {
    queue: Arc<RateLimitedQueue>,
    finished: bool,
}

impl Drain {
    async fn run(mut self) {
        loop {
            let Ok(permit) = Arc::clone(&self.queue.permits).acquire_owned().await else {
                return;
            };

            {
                let mut backlog = self.queue.lock();
                if backlog.tasks.is_empty() {
                    backlog.draining = false;
                    self.finished = true;
                    return;
                }
            }

            if let Some(pacer) = &self.queue.pacer {
                pacer.until_ready().await;
            }

            let task = {
                let mut backlog = self.queue.lock();
                let Some(task) = backlog.tasks.pop_front() else {
                    continue;
                };
                tracing::trace!(
                    depth = backlog.tasks.len(),
                    "dispatching queued task"
                );
                task
            };

            tokio::spawn(async move {
                task().await;
                drop(permit);
            });
        }
    }
}

impl Drop for Drain {
    fn drop(&mut self) {
        if !self.finished {
            self.queue.lock().draining = false;
        }
    }
}
