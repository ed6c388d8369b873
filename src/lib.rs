//! # brook
//!
//! A minimal reactive pipeline library for tokio services.
//! Two primitives. Nothing more.
//!
//! ## The contract
//!
//! - [`Solo`] — a deferred computation producing exactly one item or one
//!   failure per subscription, never both, never twice.
//! - [`Stream`] — a deferred sequence producing zero or more items followed
//!   by exactly one terminal event: completion or failure.
//!
//! Both are **lazy**: building a pipeline performs no work. Each subscribe
//! call (or `.await` on a [`Solo`]) materializes the chain independently, so
//! side effects declared in stages re-run per subscriber. Operators return a
//! new pipeline and leave the receiver definition untouched — clone a stage
//! to fan out from it.
//!
//! brook owns no scheduler: `delay` and `ticks` lean on the tokio timer, and
//! everything else runs inside whatever task materialized the pipeline.
//! Cancellation is advisory-cooperative — producers observe a flag and stop;
//! nothing is forcibly interrupted, but nothing is delivered after a cancel
//! is acknowledged.
//!
//! ## Quick start
//!
//! ```rust
//! use brook::{Solo, Stream};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let greeting = Solo::of("hello")
//!         .transform(|s| format!("{s} brook"))
//!         .await
//!         .unwrap();
//!     assert_eq!(greeting, "hello brook");
//!
//!     let firsts = Stream::from_items([1, 2, 3, 4, 5])
//!         .transform(|i| i * 2)
//!         .select_first(3)
//!         .collect_to_vec()
//!         .await
//!         .unwrap();
//!     assert_eq!(firsts, vec![2, 4, 6]);
//! }
//! ```
//!
//! The [`rest`] module is a thin HTTP adapter (hyper + matchit, built to sit
//! behind a reverse proxy) serving the demo employee API; the reactive core
//! does not depend on it.

mod emitter;
mod solo;
mod stream;
mod subscription;

pub mod failure;
pub mod rest;

pub use emitter::StreamEmitter;
pub use failure::Failure;
pub use solo::Solo;
pub use stream::Stream;
pub use subscription::Cancellation;
