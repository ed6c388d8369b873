//! The single-value async primitive.
//!
//! A [`Solo`] represents a deferred computation that produces exactly one
//! terminal event per subscription: an item or a failure, never both, never
//! twice. Like every pipeline in this crate it is lazy — building the chain
//! performs no work; each [`subscribe`](Solo::subscribe) (or `.await`)
//! independently materializes it, so side effects declared in stages re-run
//! per subscriber.
//!
//! ```rust
//! use brook::Solo;
//!
//! # #[tokio::main(flavor = "current_thread")] async fn main() {
//! let greeting = Solo::of("hello")
//!     .transform(|s| format!("{s} world"))
//!     .transform(|s| s.to_uppercase());
//!
//! assert_eq!(greeting.await.unwrap(), "HELLO WORLD");
//! # }
//! ```

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::failure::{self, Failure};
use crate::subscription::{BoxFuture, Cancellation, SubscriptionState};

/// The terminal outcome of one Solo materialization.
pub(crate) enum Outcome<T> {
    Item(T),
    Failed(Failure),
    /// The subscription was cancelled mid-pipeline; nothing is delivered.
    Halted,
}

type Produce<T> = Arc<dyn Fn(Arc<SubscriptionState>) -> BoxFuture<Outcome<T>> + Send + Sync>;

/// A lazy pipeline producing exactly one item or one failure per subscription.
///
/// Each operator returns a **new** `Solo`; the receiver is consumed and the
/// original definition stays immutable. Clone the pipeline to keep using an
/// intermediate stage.
pub struct Solo<T> {
    produce: Produce<T>,
}

impl<T> Clone for Solo<T> {
    fn clone(&self) -> Self {
        Self { produce: Arc::clone(&self.produce) }
    }
}

impl<T: Send + 'static> Solo<T> {
    pub(crate) fn from_produce(
        produce: impl Fn(Arc<SubscriptionState>) -> BoxFuture<Outcome<T>> + Send + Sync + 'static,
    ) -> Self {
        Self { produce: Arc::new(produce) }
    }

    /// A Solo that yields `item` to every subscriber.
    pub fn of(item: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::from_produce(move |_| {
            let item = item.clone();
            Box::pin(async move { Outcome::Item(item) })
        })
    }

    /// A Solo that invokes `supplier` once per subscription.
    ///
    /// Suppliers closing over shared state (an atomic counter, say) yield
    /// divergent values per subscriber — each materialization observes the
    /// state at its own subscribe time.
    pub fn from_supplier(supplier: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::from_produce(move |_| {
            let item = supplier();
            Box::pin(async move { Outcome::Item(item) })
        })
    }

    /// Like [`from_supplier`](Solo::from_supplier), but the supplier may
    /// fail; the `Err` branch becomes the failure terminal event.
    pub fn from_try_supplier(
        supplier: impl Fn() -> Result<T, Failure> + Send + Sync + 'static,
    ) -> Self {
        Self::from_produce(move |_| {
            let outcome = match supplier() {
                Ok(item) => Outcome::Item(item),
                Err(e) => Outcome::Failed(e),
            };
            Box::pin(async move { outcome })
        })
    }

    /// A Solo that yields the failure terminal event to every subscriber.
    pub fn failure(failure: Failure) -> Self {
        Self::from_produce(move |_| {
            let failure = Arc::clone(&failure);
            Box::pin(async move { Outcome::Failed(failure) })
        })
    }

    /// Failure variant whose factory runs once per subscription.
    pub fn failure_with(factory: impl Fn() -> Failure + Send + Sync + 'static) -> Self {
        Self::from_produce(move |_| {
            let failure = factory();
            Box::pin(async move { Outcome::Failed(failure) })
        })
    }

    /// Applies `f` to the item on the success path; failures pass through
    /// unchanged.
    pub fn transform<U: Send + 'static>(
        self,
        f: impl Fn(T) -> U + Send + Sync + 'static,
    ) -> Solo<U> {
        let up = self.produce;
        let f = Arc::new(f);
        Solo::from_produce(move |state| {
            let up = Arc::clone(&up);
            let f = Arc::clone(&f);
            Box::pin(async move {
                match up(state).await {
                    Outcome::Item(t) => Outcome::Item(f(t)),
                    Outcome::Failed(e) => Outcome::Failed(e),
                    Outcome::Halted => Outcome::Halted,
                }
            })
        })
    }

    /// Fallible transform: the `Err` branch is caught and re-emitted
    /// downstream as a failure terminal event. It is never raised at the
    /// subscribe call.
    pub fn try_transform<U: Send + 'static>(
        self,
        f: impl Fn(T) -> Result<U, Failure> + Send + Sync + 'static,
    ) -> Solo<U> {
        let up = self.produce;
        let f = Arc::new(f);
        Solo::from_produce(move |state| {
            let up = Arc::clone(&up);
            let f = Arc::clone(&f);
            Box::pin(async move {
                match up(state).await {
                    Outcome::Item(t) => match f(t) {
                        Ok(u) => Outcome::Item(u),
                        Err(e) => Outcome::Failed(e),
                    },
                    Outcome::Failed(e) => Outcome::Failed(e),
                    Outcome::Halted => Outcome::Halted,
                }
            })
        })
    }

    /// Runs a side effect against the item without altering it.
    pub fn invoke(self, f: impl Fn(&T) + Send + Sync + 'static) -> Solo<T> {
        self.try_invoke(move |item| {
            f(item);
            Ok(())
        })
    }

    /// Side effect whose error converts the pipeline to a failure.
    pub fn try_invoke(
        self,
        f: impl Fn(&T) -> Result<(), Failure> + Send + Sync + 'static,
    ) -> Solo<T> {
        self.try_transform(move |item| match f(&item) {
            Ok(()) => Ok(item),
            Err(e) => Err(e),
        })
    }

    /// Defers emission of the item by `duration`, handing the continuation
    /// to the tokio timer. Everything downstream of `delay` runs on the
    /// subscription's task, not on the caller of `subscribe` — do not assume
    /// the original thread. Failures are not delayed.
    pub fn delay(self, duration: Duration) -> Solo<T> {
        let up = self.produce;
        Solo::from_produce(move |state| {
            let up = Arc::clone(&up);
            Box::pin(async move {
                match up(Arc::clone(&state)).await {
                    Outcome::Item(t) => {
                        tokio::select! {
                            () = tokio::time::sleep(duration) => Outcome::Item(t),
                            () = state.cancelled_wait() => Outcome::Halted,
                        }
                    }
                    other => other,
                }
            })
        })
    }

    /// Materializes the pipeline. A failure terminal event with no failure
    /// callback registered is absorbed at the subscription boundary — logged
    /// at debug level, never propagated, never panicking.
    pub fn subscribe(&self, on_item: impl FnOnce(T) + Send + 'static) -> Cancellation {
        self.materialize(on_item, None::<fn(Failure)>)
    }

    /// Materializes the pipeline with both callbacks. Exactly one of them
    /// fires, exactly once — unless the subscription is cancelled first, in
    /// which case neither does.
    pub fn subscribe_with(
        &self,
        on_item: impl FnOnce(T) + Send + 'static,
        on_failure: impl FnOnce(Failure) + Send + 'static,
    ) -> Cancellation {
        self.materialize(on_item, Some(on_failure))
    }

    fn materialize<I, F>(&self, on_item: I, on_failure: Option<F>) -> Cancellation
    where
        I: FnOnce(T) + Send + 'static,
        F: FnOnce(Failure) + Send + 'static,
    {
        let state = SubscriptionState::new();
        state.request(u64::MAX);
        let produce = Arc::clone(&self.produce);
        let task_state = Arc::clone(&state);
        tokio::spawn(async move {
            let outcome = produce(Arc::clone(&task_state)).await;
            if task_state.is_cancelled() {
                return;
            }
            match outcome {
                Outcome::Item(item) => {
                    task_state.claim();
                    task_state.halt();
                    on_item(item);
                }
                Outcome::Failed(e) => {
                    task_state.halt();
                    match on_failure {
                        Some(cb) => cb(e),
                        None => debug!(failure = %e, "unhandled pipeline failure absorbed"),
                    }
                }
                Outcome::Halted => {}
            }
        });
        Cancellation::new(state)
    }
}

impl<T: Send + 'static> Solo<Option<T>> {
    /// A Solo that yields the designated no-value item, `None`.
    ///
    /// Distinct from a failure, and from a `Stream`'s empty sequence: the
    /// subscriber's item callback does fire, with nothing in hand.
    pub fn empty() -> Solo<Option<T>> {
        Solo::from_supplier(|| None)
    }
}

/// Awaiting a Solo materializes it on the current task and yields its
/// terminal event — the bridge from callback-style pipelines into async
/// handler code.
impl<T: Send + 'static> IntoFuture for Solo<T> {
    type Output = Result<T, Failure>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<T, Failure>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let state = SubscriptionState::new();
            state.request(u64::MAX);
            match (self.produce)(state).await {
                Outcome::Item(item) => Ok(item),
                Outcome::Failed(e) => Err(e),
                Outcome::Halted => Err(failure::cancelled()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    fn boom() -> Failure {
        failure::message("boom")
    }

    #[tokio::test]
    async fn of_yields_item_exactly_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Solo::of(42).subscribe_with(
            move |item| tx.send(item).unwrap(),
            |_| panic!("no failure expected"),
        );
        assert_eq!(rx.recv().await.unwrap(), 42);
        // second event would violate the terminal invariant
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn failure_yields_failure_never_item() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Solo::<i32>::failure(boom()).subscribe_with(
            |_| panic!("no item expected"),
            move |e| tx.send(e.to_string()).unwrap(),
        );
        assert_eq!(rx.recv().await.unwrap(), "boom");
    }

    #[tokio::test]
    async fn transform_chain_applies_in_order() {
        let result = Solo::of("hello")
            .transform(|s| format!("{s} brook"))
            .transform(|s| s.to_uppercase())
            .await
            .unwrap();
        assert_eq!(result, "HELLO BROOK");
    }

    #[tokio::test]
    async fn transform_passes_failures_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let err = Solo::<i32>::failure(boom())
            .transform(move |i| {
                seen.fetch_add(1, Ordering::SeqCst);
                i * 2
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn try_transform_error_becomes_failure_event() {
        let err = Solo::of(1)
            .try_transform(|_| Err::<i32, _>(failure::message("stage blew up")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "stage blew up");
    }

    #[tokio::test]
    async fn try_invoke_error_converts_pipeline() {
        let err = Solo::of(7)
            .try_invoke(|_| Err(failure::message("side effect failed")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "side effect failed");
    }

    #[tokio::test]
    async fn invoke_observes_without_altering() {
        let seen = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&seen);
        let item = Solo::of(9)
            .invoke(move |i| {
                probe.store(*i as usize, Ordering::SeqCst);
            })
            .await
            .unwrap();
        assert_eq!(item, 9);
        assert_eq!(seen.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn supplier_diverges_per_subscription() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let solo = Solo::from_supplier(move || c.fetch_add(1, Ordering::SeqCst));

        assert_eq!(solo.clone().await.unwrap(), 0);
        assert_eq!(solo.clone().await.unwrap(), 1);
        assert_eq!(solo.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn failure_with_factory_runs_per_subscription() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let solo =
            Solo::<i32>::failure_with(move || {
                failure::message(format!("boom {}", c.fetch_add(1, Ordering::SeqCst)))
            });
        assert_eq!(solo.clone().await.unwrap_err().to_string(), "boom 0");
        assert_eq!(solo.await.unwrap_err().to_string(), "boom 1");
    }

    #[tokio::test]
    async fn empty_yields_the_no_value_item() {
        assert_eq!(Solo::<Option<i32>>::empty().await.unwrap(), None);
    }

    #[tokio::test]
    async fn delay_defers_and_leaves_caller_thread() {
        let started = std::time::Instant::now();
        let item = Solo::of(5).delay(Duration::from_millis(30)).await.unwrap();
        assert_eq!(item, 5);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn cancel_during_delay_suppresses_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = Solo::of(1)
            .delay(Duration::from_secs(30))
            .subscribe(move |item| tx.send(item).unwrap());
        handle.cancel();
        assert!(handle.is_cancelled());
        // the sender side drops once the task observes cancellation
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn unhandled_failure_is_absorbed_silently() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Solo::<i32>::failure(boom()).subscribe(move |item| tx.send(item).unwrap());
        // no panic, no item: the sender drops untouched
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn subscribing_is_lazy() {
        let ran = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&ran);
        let solo = Solo::from_supplier(move || probe.fetch_add(1, Ordering::SeqCst));
        tokio::task::yield_now().await;
        assert_eq!(ran.load(Ordering::SeqCst), 0, "no work before subscribe");
        solo.await.unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
