//! The multi-value async primitive.
//!
//! A [`Stream`] represents a deferred sequence: zero or more items followed
//! by exactly one terminal event — completion or failure — per subscription.
//! Per subscription it moves through `Unsubscribed → Active → {Completed |
//! Failed | Cancelled}`; nothing is delivered after a terminal state.
//!
//! Pipelines are descriptions. Each operator wraps the stage below it and
//! returns a new `Stream`; subscribing walks the chain once per subscriber
//! and produces an independent execution, so supplier-based sources may
//! yield different sequences to different subscribers.
//!
//! ```rust
//! use brook::Stream;
//!
//! # #[tokio::main(flavor = "current_thread")] async fn main() {
//! let doubled = Stream::from_items([1, 2, 3, 4, 5])
//!     .transform(|i| i * 2)
//!     .select_first(3);
//!
//! assert_eq!(doubled.collect_to_vec().await.unwrap(), vec![2, 4, 6]);
//! # }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::emitter::{Event, SinkFn, StreamEmitter};
use crate::failure::Failure;
use crate::solo::{Outcome, Solo};
use crate::subscription::{BoxFuture, Cancellation, SubscriptionState};

type Source<T> = Arc<dyn Fn(StreamEmitter<T>) -> BoxFuture<()> + Send + Sync>;

/// A lazy pipeline producing zero or more items then one terminal event per
/// subscription.
pub struct Stream<T> {
    source: Source<T>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self { source: Arc::clone(&self.source) }
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

impl<T: Send + 'static> Stream<T> {
    fn from_source(
        source: impl Fn(StreamEmitter<T>) -> BoxFuture<()> + Send + Sync + 'static,
    ) -> Self {
        Self { source: Arc::new(source) }
    }

    /// Replays the fixed sequence identically to every subscriber.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone + Sync,
    {
        let items: Arc<Vec<T>> = Arc::new(items.into_iter().collect());
        Self::from_source(move |em| {
            let items = Arc::clone(&items);
            Box::pin(async move {
                for item in items.iter() {
                    if em.is_halted() {
                        return;
                    }
                    em.emit(item.clone());
                }
                em.complete();
            })
        })
    }

    /// Builds the sequence from a factory invoked once per subscription.
    ///
    /// Factories closing over shared state see each materialization advance
    /// that state, so concurrent subscribers observe different,
    /// state-dependent sequences. That divergence is the point of this
    /// constructor, not a defect — but keep the shared state atomic.
    pub fn from_supplier_iter<I>(supplier: impl Fn() -> I + Send + Sync + 'static) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::from_source(move |em| {
            // the factory runs at materialization time, before any emission
            let iter = supplier().into_iter();
            Box::pin(async move {
                for item in iter {
                    if em.is_halted() {
                        return;
                    }
                    em.emit(item);
                }
                em.complete();
            })
        })
    }

    /// Zero items, then the completion terminal event.
    pub fn empty() -> Self {
        Self::from_source(|em| {
            Box::pin(async move {
                em.complete();
            })
        })
    }

    /// Zero items, then the failure terminal event, for every subscriber.
    pub fn failure(failure: Failure) -> Self {
        Self::from_source(move |em| {
            let failure = Arc::clone(&failure);
            Box::pin(async move {
                em.fail(failure);
            })
        })
    }

    /// Failure variant whose factory runs once per subscription.
    pub fn failure_with(factory: impl Fn() -> Failure + Send + Sync + 'static) -> Self {
        Self::from_source(move |em| {
            let failure = factory();
            Box::pin(async move {
                em.fail(failure);
            })
        })
    }

    /// Integrates a callback-based producer. The callback receives a
    /// [`StreamEmitter`] and drives the sequence manually; it should watch
    /// [`is_halted`](StreamEmitter::is_halted) /
    /// [`is_cancelled`](StreamEmitter::is_cancelled) and stop producing once
    /// the subscriber is gone.
    pub fn from_emitter(producer: impl Fn(StreamEmitter<T>) + Send + Sync + 'static) -> Self {
        let producer = Arc::new(producer);
        Self::from_source(move |em| {
            let producer = Arc::clone(&producer);
            Box::pin(async move {
                producer(em);
            })
        })
    }

    /// The general recursive-sequence constructor. `seed` supplies the
    /// initial state per subscription; `step(state, emitter)` is invoked
    /// repeatedly and returns the next state, deciding per call whether to
    /// emit a derived value or complete. Iteration stops at the terminal
    /// call or on cancellation.
    ///
    /// ```rust
    /// use brook::Stream;
    ///
    /// # #[tokio::main(flavor = "current_thread")] async fn main() {
    /// let seq = Stream::generate(|| 1, |n, em| {
    ///     let next = n + n / 2 + 1;
    ///     if n < 50 { em.emit(next) } else { em.complete() }
    ///     next
    /// });
    /// assert_eq!(
    ///     seq.collect_to_vec().await.unwrap(),
    ///     vec![2, 4, 7, 11, 17, 26, 40, 61],
    /// );
    /// # }
    /// ```
    pub fn generate<S: Send + 'static>(
        seed: impl Fn() -> S + Send + Sync + 'static,
        step: impl Fn(S, &StreamEmitter<T>) -> S + Send + Sync + 'static,
    ) -> Self {
        let seed = Arc::new(seed);
        let step = Arc::new(step);
        Self::from_source(move |em| {
            let seed = Arc::clone(&seed);
            let step = Arc::clone(&step);
            Box::pin(async move {
                let mut state = seed();
                while !em.is_halted() {
                    state = step(state, &em);
                    // stay cooperative: an unbounded generator must not
                    // starve the runtime between emissions
                    tokio::task::yield_now().await;
                }
            })
        })
    }
}

impl Stream<u64> {
    /// An unbounded sequence of monotonically increasing counters, one per
    /// elapsed interval, until cancelled. Restarts from zero for every
    /// subscription.
    pub fn ticks(every: Duration) -> Stream<u64> {
        Stream::from_source(move |em| {
            Box::pin(async move {
                let mut n: u64 = 0;
                loop {
                    tokio::select! {
                        () = tokio::time::sleep(every) => {}
                        () = em.cancelled_wait() => return,
                    }
                    if em.is_halted() {
                        return;
                    }
                    em.emit(n);
                    n += 1;
                }
            })
        })
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl<T: Send + 'static> Stream<T> {
    /// The uniform stage combinator every operator is built on: `stage` runs
    /// once per subscription, receives the downstream emitter, and returns
    /// the sink this stage presents to upstream.
    fn lift<U: Send + 'static>(
        self,
        stage: impl Fn(StreamEmitter<U>) -> SinkFn<T> + Send + Sync + 'static,
    ) -> Stream<U> {
        let up = self.source;
        Stream::from_source(move |down: StreamEmitter<U>| {
            let state = Arc::clone(down.state());
            let sink = stage(down);
            (up)(StreamEmitter::new(state, sink))
        })
    }

    /// Applies `f` to every item; terminal events pass through unchanged.
    pub fn transform<U: Send + 'static>(
        self,
        f: impl Fn(T) -> U + Send + Sync + 'static,
    ) -> Stream<U> {
        let f = Arc::new(f);
        self.lift(move |down| {
            let f = Arc::clone(&f);
            Arc::new(move |ev| match ev {
                Event::Item(item) => down.emit(f(item)),
                Event::Complete => down.complete(),
                Event::Failed(e) => down.fail(e),
            })
        })
    }

    /// Fallible per-item transform: an `Err` becomes the failure terminal
    /// event, delivered downstream instead of raised at the subscribe call.
    pub fn try_transform<U: Send + 'static>(
        self,
        f: impl Fn(T) -> Result<U, Failure> + Send + Sync + 'static,
    ) -> Stream<U> {
        let f = Arc::new(f);
        self.lift(move |down| {
            let f = Arc::clone(&f);
            Arc::new(move |ev| match ev {
                Event::Item(item) => match f(item) {
                    Ok(mapped) => down.emit(mapped),
                    Err(e) => down.fail(e),
                },
                Event::Complete => down.complete(),
                Event::Failed(e) => down.fail(e),
            })
        })
    }

    /// Runs a side effect per item without altering it.
    pub fn invoke(self, f: impl Fn(&T) + Send + Sync + 'static) -> Stream<T> {
        self.try_invoke(move |item| {
            f(item);
            Ok(())
        })
    }

    /// Per-item side effect whose error converts the stream to a failure.
    pub fn try_invoke(
        self,
        f: impl Fn(&T) -> Result<(), Failure> + Send + Sync + 'static,
    ) -> Stream<T> {
        self.try_transform(move |item| match f(&item) {
            Ok(()) => Ok(item),
            Err(e) => Err(e),
        })
    }

    /// At most the first `n` items, then a synthesized completion — even if
    /// upstream had more. Upstream production halts cooperatively once the
    /// limit is reached.
    pub fn select_first(self, n: u64) -> Stream<T> {
        self.lift(move |down| {
            if n == 0 {
                down.complete();
            }
            let remaining = AtomicU64::new(n);
            Arc::new(move |ev| match ev {
                Event::Item(item) => {
                    let claimed = remaining.fetch_update(
                        Ordering::AcqRel,
                        Ordering::Acquire,
                        |r| r.checked_sub(1),
                    );
                    if let Ok(before) = claimed {
                        down.emit(item);
                        if before == 1 {
                            down.complete();
                        }
                    }
                }
                Event::Complete => down.complete(),
                Event::Failed(e) => down.fail(e),
            })
        })
    }

    /// Intercepts a failure terminal event and substitutes one fallback item
    /// followed by completion. The failure never reaches the subscriber.
    pub fn recover_with_item(self, fallback: impl Fn() -> T + Send + Sync + 'static) -> Stream<T> {
        let fallback = Arc::new(fallback);
        self.lift(move |down| {
            let fallback = Arc::clone(&fallback);
            Arc::new(move |ev| match ev {
                Event::Item(item) => down.emit(item),
                Event::Complete => down.complete(),
                Event::Failed(_) => {
                    down.emit(fallback());
                    down.complete();
                }
            })
        })
    }

    // ── Lifecycle hooks — pure side channels, never alter the events ─────────

    /// Observer invoked when a subscription is established, before any
    /// demand is signalled.
    pub fn on_subscription(self, obs: impl Fn() + Send + Sync + 'static) -> Stream<T> {
        let up = self.source;
        Stream::from_source(move |em| {
            obs();
            (up)(em)
        })
    }

    /// Observer invoked for every item flowing through this stage.
    pub fn on_item(self, obs: impl Fn(&T) + Send + Sync + 'static) -> Stream<T> {
        self.invoke(obs)
    }

    /// Observer invoked when a failure terminal event passes this stage.
    pub fn on_failure(self, obs: impl Fn(&Failure) + Send + Sync + 'static) -> Stream<T> {
        let obs = Arc::new(obs);
        self.lift(move |down| {
            let obs = Arc::clone(&obs);
            Arc::new(move |ev| match ev {
                Event::Item(item) => down.emit(item),
                Event::Complete => down.complete(),
                Event::Failed(e) => {
                    obs(&e);
                    down.fail(e);
                }
            })
        })
    }

    /// Observer invoked when the completion terminal event passes this stage.
    pub fn on_completion(self, obs: impl Fn() + Send + Sync + 'static) -> Stream<T> {
        let obs = Arc::new(obs);
        self.lift(move |down| {
            let obs = Arc::clone(&obs);
            Arc::new(move |ev| match ev {
                Event::Item(item) => down.emit(item),
                Event::Complete => {
                    obs();
                    down.complete();
                }
                Event::Failed(e) => down.fail(e),
            })
        })
    }

    /// Observer invoked when the subscriber cancels.
    pub fn on_cancellation(self, obs: impl Fn() + Send + Sync + 'static) -> Stream<T> {
        let obs = Arc::new(obs);
        self.lift(move |down| {
            let registered = Arc::clone(&obs);
            down.state().observe_cancel(move || registered());
            Arc::new(move |ev| match ev {
                Event::Item(item) => down.emit(item),
                Event::Complete => down.complete(),
                Event::Failed(e) => down.fail(e),
            })
        })
    }

    /// Observer invoked whenever the subscriber signals demand (plain
    /// `subscribe` signals `u64::MAX` once at materialization).
    pub fn on_request(self, obs: impl Fn(u64) + Send + Sync + 'static) -> Stream<T> {
        let obs = Arc::new(obs);
        self.lift(move |down| {
            let registered = Arc::clone(&obs);
            down.state().observe_request(move |n| registered(n));
            Arc::new(move |ev| match ev {
                Event::Item(item) => down.emit(item),
                Event::Complete => down.complete(),
                Event::Failed(e) => down.fail(e),
            })
        })
    }

    // ── Terminal stages ───────────────────────────────────────────────────────

    /// Gathers every item into a `Vec`, yielding it as a [`Solo`] when the
    /// stream completes. A stream failure becomes the Solo's failure.
    pub fn collect_to_vec(self) -> Solo<Vec<T>> {
        let stream = self;
        Solo::from_produce(move |state| {
            let stream = stream.clone();
            Box::pin(async move {
                let (tx, rx) = tokio::sync::oneshot::channel::<Result<Vec<T>, Failure>>();
                let tx = Arc::new(Mutex::new(Some(tx)));
                let items = Arc::new(Mutex::new(Vec::new()));

                let acc = Arc::clone(&items);
                let tx_fail = Arc::clone(&tx);
                let handle = stream.subscribe_with(
                    move |item| acc.lock().expect("collector poisoned").push(item),
                    move |e| {
                        if let Some(tx) = tx_fail.lock().expect("collector poisoned").take() {
                            let _ = tx.send(Err(e));
                        }
                    },
                    move || {
                        if let Some(sender) = tx.lock().expect("collector poisoned").take() {
                            let collected =
                                std::mem::take(&mut *items.lock().expect("collector poisoned"));
                            let _ = sender.send(Ok(collected));
                        }
                    },
                );

                tokio::select! {
                    terminal = rx => match terminal {
                        Ok(Ok(collected)) => Outcome::Item(collected),
                        Ok(Err(e)) => Outcome::Failed(e),
                        Err(_) => Outcome::Halted,
                    },
                    () = state.cancelled_wait() => {
                        handle.cancel();
                        Outcome::Halted
                    }
                }
            })
        })
    }

    // ── Subscription ──────────────────────────────────────────────────────────

    /// Materializes the pipeline with an item callback and unbounded demand.
    /// Failure and completion terminal events are absorbed at the boundary
    /// (failures logged at debug level).
    pub fn subscribe(&self, on_item: impl Fn(T) + Send + Sync + 'static) -> Cancellation {
        self.subscribe_with(
            on_item,
            |e| debug!(failure = %e, "unhandled stream failure absorbed"),
            || {},
        )
    }

    /// Materializes the pipeline with the full set of subscriber callbacks.
    /// `on_item` may fire any number of times; afterwards exactly one of
    /// `on_failure` / `on_completion` fires — unless the subscription is
    /// cancelled first.
    pub fn subscribe_with(
        &self,
        on_item: impl Fn(T) + Send + Sync + 'static,
        on_failure: impl FnOnce(Failure) + Send + 'static,
        on_completion: impl FnOnce() + Send + 'static,
    ) -> Cancellation {
        let state = SubscriptionState::new();

        let terminated = AtomicBool::new(false);
        let on_failure = Mutex::new(Some(on_failure));
        let on_completion = Mutex::new(Some(on_completion));
        let boundary = Arc::clone(&state);
        let sink: SinkFn<T> = Arc::new(move |event| {
            if boundary.is_cancelled() || terminated.load(Ordering::Acquire) {
                return;
            }
            match event {
                Event::Item(item) => {
                    boundary.claim();
                    on_item(item);
                }
                Event::Complete => {
                    terminated.store(true, Ordering::Release);
                    boundary.halt();
                    if let Some(cb) = on_completion.lock().expect("subscriber poisoned").take() {
                        cb();
                    }
                }
                Event::Failed(e) => {
                    terminated.store(true, Ordering::Release);
                    boundary.halt();
                    if let Some(cb) = on_failure.lock().expect("subscriber poisoned").take() {
                        cb(e);
                    }
                }
            }
        });

        let emitter = StreamEmitter::new(Arc::clone(&state), sink);
        let source = Arc::clone(&self.source);
        let task_state = Arc::clone(&state);
        tokio::spawn(async move {
            // walking the chain registers the lifecycle hooks; signal demand
            // only once that is done, then let the source run
            let materialized = (source)(emitter);
            task_state.request(u64::MAX);
            materialized.await;
        });

        Cancellation::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::mpsc;

    /// Subscribes and gathers every delivered event as a string, closing the
    /// channel at the terminal event.
    fn record<T: std::fmt::Debug + Send + 'static>(
        stream: &Stream<T>,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_item = tx.clone();
        let tx_fail = tx.clone();
        stream.subscribe_with(
            move |item| tx_item.send(format!("item {item:?}")).unwrap(),
            move |e| tx_fail.send(format!("failed {e}")).unwrap(),
            move || tx.send("completed".into()).unwrap(),
        );
        rx
    }

    async fn drain(mut rx: mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            let terminal = ev == "completed" || ev.starts_with("failed");
            events.push(ev);
            if terminal {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn transform_and_select_first() {
        let transforms = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&transforms);
        let stream = Stream::from_items([1, 2, 3, 4, 5])
            .transform(move |i| {
                counted.fetch_add(1, Ordering::SeqCst);
                i * 2
            })
            .select_first(3)
            .recover_with_item(|| 0);

        let events = drain(record(&stream)).await;
        assert_eq!(events, vec!["item 2", "item 4", "item 6", "completed"]);
        // the halt propagated upstream: items 4 and 5 never entered the stage
        assert_eq!(transforms.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_completes_with_zero_items() {
        let events = drain(record(&Stream::<i32>::empty())).await;
        assert_eq!(events, vec!["completed"]);
    }

    #[tokio::test]
    async fn recover_substitutes_item_and_completes() {
        let stream =
            Stream::<i32>::failure(failure::message("boom")).recover_with_item(|| 0);
        let events = drain(record(&stream)).await;
        assert_eq!(events, vec!["item 0", "completed"]);
    }

    #[tokio::test]
    async fn failure_reaches_subscriber_without_recovery() {
        let events = drain(record(&Stream::<i32>::failure(failure::message("boom")))).await;
        assert_eq!(events, vec!["failed boom"]);
    }

    #[tokio::test]
    async fn generator_reproduces_reference_sequence() {
        let seq = Stream::generate(
            || 1,
            |n, em| {
                let next = n + n / 2 + 1;
                if n < 50 {
                    em.emit(next);
                } else {
                    em.complete();
                }
                next
            },
        );
        assert_eq!(
            seq.collect_to_vec().await.unwrap(),
            vec![2, 4, 7, 11, 17, 26, 40, 61],
        );
    }

    #[tokio::test]
    async fn supplier_sequences_diverge_per_subscription() {
        let counter = Arc::new(AtomicUsize::new(0));
        let shared = Arc::clone(&counter);
        let stream = Stream::from_supplier_iter(move || {
            let start = shared.fetch_add(1, Ordering::SeqCst);
            start..(start + 1) * 2
        });

        // each materialization advances the shared counter, so every
        // subscriber observes its own counter-dependent range
        assert_eq!(stream.clone().collect_to_vec().await.unwrap(), vec![0, 1]);
        assert_eq!(stream.collect_to_vec().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fixed_items_replay_identically() {
        let stream = Stream::from_items([1, 2, 3]);
        assert_eq!(stream.clone().collect_to_vec().await.unwrap(), vec![1, 2, 3]);
        assert_eq!(stream.collect_to_vec().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn emitter_sequence_stops_at_terminal() {
        let stream = Stream::from_emitter(|em| {
            em.emit(1);
            em.emit(2);
            em.complete();
            // events after the terminal are silently ignored
            em.emit(3);
            em.fail(failure::message("late"));
        });
        let events = drain(record(&stream)).await;
        assert_eq!(events, vec!["item 1", "item 2", "completed"]);
    }

    #[tokio::test]
    async fn emitter_observes_downstream_halt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&attempts);
        let stream = Stream::from_emitter(move |em| {
            for i in 0..100 {
                if em.is_halted() {
                    return;
                }
                counted.fetch_add(1, Ordering::SeqCst);
                em.emit(i);
            }
            em.complete();
        })
        .select_first(3);

        let events = drain(record(&stream)).await;
        assert_eq!(events, vec!["item 0", "item 1", "item 2", "completed"]);
        assert_eq!(attempts.load(Ordering::SeqCst), 3, "producer saw the halt");
    }

    #[tokio::test]
    async fn ticks_deliver_nothing_after_cancellation() {
        let cancelled_seen = Arc::new(AtomicUsize::new(0));
        let obs = Arc::clone(&cancelled_seen);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = Stream::ticks(Duration::from_millis(5))
            .on_cancellation(move || {
                obs.fetch_add(1, Ordering::SeqCst);
            })
            .subscribe(move |n| {
                let _ = tx.send(n);
            });

        assert_eq!(rx.recv().await, Some(0));
        assert_eq!(rx.recv().await, Some(1));
        handle.cancel();

        // the source abandons its timer wait and drops the sender; anything
        // still in the channel was delivered before the cancel
        let mut after = 0;
        while rx.recv().await.is_some() {
            after += 1;
        }
        assert!(after <= 1, "at most one in-flight tick, got {after}");
        assert_eq!(cancelled_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hooks_fire_in_lifecycle_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();

        let l1 = Arc::clone(&log);
        let l2 = Arc::clone(&log);
        let l3 = Arc::clone(&log);
        let l4 = Arc::clone(&log);
        let done = Mutex::new(Some(done_tx));
        Stream::from_items([1, 2, 3])
            .on_subscription(move || l1.lock().unwrap().push("subscribed".to_string()))
            .on_request(move |n| l2.lock().unwrap().push(format!("requested {n}")))
            .on_item(move |i| l3.lock().unwrap().push(format!("item {i}")))
            .on_completion(move || {
                l4.lock().unwrap().push("completed".to_string());
                if let Some(tx) = done.lock().unwrap().take() {
                    let _ = tx.send(());
                }
            })
            .subscribe(|_| {});

        done_rx.await.unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "subscribed".to_string(),
                format!("requested {}", u64::MAX),
                "item 1".to_string(),
                "item 2".to_string(),
                "item 3".to_string(),
                "completed".to_string(),
            ],
        );
    }

    #[tokio::test]
    async fn try_transform_failure_terminates_stream() {
        let stream = Stream::from_items([1, 2, 3]).try_transform(|i| {
            if i < 3 {
                Ok(i * 10)
            } else {
                Err(failure::message("stage blew up"))
            }
        });
        let events = drain(record(&stream)).await;
        assert_eq!(events, vec!["item 10", "item 20", "failed stage blew up"]);
    }

    #[tokio::test]
    async fn collect_propagates_failure() {
        let err = Stream::<i32>::failure(failure::message("boom"))
            .collect_to_vec()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn subscribing_is_lazy() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&pulls);
        let stream = Stream::from_supplier_iter(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            0..3
        });
        tokio::task::yield_now().await;
        assert_eq!(pulls.load(Ordering::SeqCst), 0, "no work before subscribe");
        stream.collect_to_vec().await.unwrap();
        assert_eq!(pulls.load(Ordering::SeqCst), 1);
    }
}
