//! Pipeline failure values.
//!
//! Inside a pipeline, errors travel as events, not as return values of the
//! subscribe call. A stage that fails emits a [`Failure`] downstream; the
//! subscriber's failure callback receives it as the terminal event. Because
//! a fixed failure source replays the same error to every subscriber, the
//! value is reference-counted rather than owned.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// A shared error value carried by a failure terminal event.
///
/// Any `Error + Send + Sync` type can be lifted into a `Failure` with
/// [`Arc::new`]; for ad-hoc cases use [`message`].
pub type Failure = Arc<dyn Error + Send + Sync + 'static>;

/// A plain-text failure for pipelines with no richer error type.
#[derive(Debug, Clone)]
pub struct Message(pub String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for Message {}

/// Builds a [`Failure`] from a message string.
///
/// ```rust
/// use brook::{Solo, failure};
///
/// Solo::<i32>::failure(failure::message("boom"));
/// ```
pub fn message(msg: impl Into<String>) -> Failure {
    Arc::new(Message(msg.into()))
}

/// The failure reported when a pipeline is awaited and its subscription is
/// cancelled before a terminal event arrives.
pub(crate) fn cancelled() -> Failure {
    message("subscription cancelled")
}
