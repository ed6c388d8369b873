//! Per-subscription state and the [`Cancellation`] handle.
//!
//! Every `subscribe` call creates one [`SubscriptionState`]: the demand
//! counter, the cancellation flag, and the observer lists for the
//! cancellation and request lifecycle hooks. The subscriber owns the state
//! through its [`Cancellation`] handle; every stage of the materialized
//! pipeline holds the same `Arc` and consults it cooperatively.
//!
//! Cancellation is advisory: setting the flag does not interrupt in-flight
//! synchronous work, but no event is delivered to the subscriber afterwards,
//! and time-based sources (`delay`, `ticks`) wake from their timer waits
//! through the watch channel and stop producing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// A heap-allocated, type-erased future produced by a pipeline stage.
pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

pub(crate) struct SubscriptionState {
    /// Set once by [`cancel`](SubscriptionState::cancel); never cleared.
    cancelled: AtomicBool,
    /// Upstream stop flag: set on cancellation and on any terminal event
    /// reaching the subscriber. Sources poll it between emissions.
    halted: AtomicBool,
    /// Outstanding demand. Plain `subscribe` signals `u64::MAX` once.
    demand: AtomicU64,
    /// Wakes timer waits (`delay`, `ticks`) when the subscription is cancelled.
    cancel_tx: watch::Sender<bool>,
    on_cancel: Mutex<Vec<Box<dyn Fn() + Send>>>,
    on_request: Mutex<Vec<Box<dyn Fn(u64) + Send>>>,
}

impl SubscriptionState {
    pub(crate) fn new() -> Arc<Self> {
        let (cancel_tx, _) = watch::channel(false);
        Arc::new(Self {
            cancelled: AtomicBool::new(false),
            halted: AtomicBool::new(false),
            demand: AtomicU64::new(0),
            cancel_tx,
            on_cancel: Mutex::new(Vec::new()),
            on_request: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Stops upstream production without marking the subscription cancelled.
    /// Called when a terminal event reaches the subscriber boundary.
    pub(crate) fn halt(&self) {
        self.halted.store(true, Ordering::Release);
    }

    /// Cancels the subscription: suppresses further delivery, halts upstream
    /// production, wakes timer waits, and runs the cancellation observers.
    /// Idempotent — observers run at most once.
    pub(crate) fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        self.halt();
        let _ = self.cancel_tx.send(true);
        let observers = self.on_cancel.lock().expect("cancel observers poisoned");
        for obs in observers.iter() {
            obs();
        }
    }

    /// Resolves once the subscription has been cancelled.
    pub(crate) async fn cancelled_wait(&self) {
        let mut rx = self.cancel_tx.subscribe();
        // wait_for checks the current value first, so a cancel that happened
        // before this call still resolves immediately.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Adds `n` to the outstanding demand (saturating) and notifies the
    /// request observers.
    pub(crate) fn request(&self, n: u64) {
        let _ = self
            .demand
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |d| {
                Some(d.saturating_add(n))
            });
        let observers = self.on_request.lock().expect("request observers poisoned");
        for obs in observers.iter() {
            obs(n);
        }
    }

    pub(crate) fn requested(&self) -> u64 {
        self.demand.load(Ordering::Acquire)
    }

    /// Consumes one unit of demand when an item crosses the subscriber
    /// boundary. Saturates at zero.
    pub(crate) fn claim(&self) {
        let _ = self
            .demand
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |d| {
                Some(d.saturating_sub(1))
            });
    }

    pub(crate) fn observe_cancel(&self, obs: impl Fn() + Send + 'static) {
        // a hook registered after the fact still gets its notification
        if self.is_cancelled() {
            obs();
            return;
        }
        self.on_cancel
            .lock()
            .expect("cancel observers poisoned")
            .push(Box::new(obs));
    }

    pub(crate) fn observe_request(&self, obs: impl Fn(u64) + Send + 'static) {
        self.on_request
            .lock()
            .expect("request observers poisoned")
            .push(Box::new(obs));
    }
}

/// The handle returned by `subscribe`.
///
/// Dropping the handle does **not** cancel the subscription — the pipeline
/// keeps running to its terminal event. Call [`cancel`](Cancellation::cancel)
/// to stop it.
#[derive(Clone)]
pub struct Cancellation {
    state: Arc<SubscriptionState>,
}

impl Cancellation {
    pub(crate) fn new(state: Arc<SubscriptionState>) -> Self {
        Self { state }
    }

    /// Cancels the subscription. No item, failure, or completion callback
    /// fires after this returns. Cooperative: in-flight synchronous work is
    /// not interrupted, but its output is discarded.
    pub fn cancel(&self) {
        self.state.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// Signals additional demand to the producer side. Plain `subscribe`
    /// already requests `u64::MAX`; bounded consumers can observe and pace
    /// production through [`StreamEmitter::requested`](crate::StreamEmitter::requested).
    pub fn request(&self, n: u64) {
        self.state.request(n);
    }
}
