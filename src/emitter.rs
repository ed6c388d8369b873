//! The emitter capability object handed to callback-based sources.
//!
//! A [`StreamEmitter`] is one stage's handle to the stage below it. Sources
//! built with [`Stream::from_emitter`](crate::Stream::from_emitter) or
//! [`Stream::generate`](crate::Stream::generate) receive one and drive the
//! sequence manually: zero or more [`emit`](StreamEmitter::emit) calls
//! followed by at most one [`complete`](StreamEmitter::complete) or
//! [`fail`](StreamEmitter::fail). After the terminal call — or once the
//! subscription is cancelled — every further call is silently ignored, which
//! is what upholds the no-events-after-terminal invariant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::failure::Failure;
use crate::subscription::SubscriptionState;

/// One event flowing down a materialized pipeline.
pub(crate) enum Event<T> {
    Item(T),
    Complete,
    Failed(Failure),
}

/// A type-erased per-subscription event sink. Operators are closures over
/// the downstream emitter; the subscriber boundary is the innermost sink.
pub(crate) type SinkFn<T> = Arc<dyn Fn(Event<T>) + Send + Sync>;

/// Manual emission capability for one subscription.
///
/// Cloneable so a callback can move it into a spawned task or another
/// callback-based API; all clones share the same terminal flag.
pub struct StreamEmitter<T> {
    state: Arc<SubscriptionState>,
    sink: SinkFn<T>,
    done: Arc<AtomicBool>,
}

impl<T> Clone for StreamEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            sink: Arc::clone(&self.sink),
            done: Arc::clone(&self.done),
        }
    }
}

impl<T: Send + 'static> StreamEmitter<T> {
    pub(crate) fn new(state: Arc<SubscriptionState>, sink: SinkFn<T>) -> Self {
        Self { state, sink, done: Arc::new(AtomicBool::new(false)) }
    }

    pub(crate) fn state(&self) -> &Arc<SubscriptionState> {
        &self.state
    }

    /// Emits one item downstream. Ignored after a terminal call, after
    /// cancellation, or once a downstream stage has stopped the sequence.
    pub fn emit(&self, item: T) {
        if self.is_halted() {
            return;
        }
        (self.sink)(Event::Item(item));
    }

    /// Emits the completion terminal event. At most one terminal call per
    /// subscription takes effect.
    pub fn complete(&self) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        (self.sink)(Event::Complete);
    }

    /// Emits the failure terminal event.
    pub fn fail(&self, failure: Failure) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        (self.sink)(Event::Failed(failure));
    }

    /// True once the subscriber cancelled. Long-running callbacks should poll
    /// this and stop producing.
    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// True once no further emission can be observed: a terminal event was
    /// emitted, the sequence was stopped downstream (e.g. by `select_first`),
    /// or the subscription was cancelled.
    pub fn is_halted(&self) -> bool {
        self.done.load(Ordering::Acquire) || self.state.is_halted()
    }

    /// Outstanding downstream demand, for sources that pace themselves.
    pub fn requested(&self) -> u64 {
        self.state.requested()
    }

    /// Resolves when the subscriber cancels. Used by timer-driven sources to
    /// abandon their waits.
    pub(crate) async fn cancelled_wait(&self) {
        self.state.cancelled_wait().await;
    }
}
