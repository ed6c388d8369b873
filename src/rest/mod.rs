//! Thin HTTP adapter for the demo employee API.
//!
//! Framework glue, deliberately minimal: a radix-tree router, a fluent
//! response builder, a status-code lookup table, and an error taxonomy
//! mapped at the boundary. The interesting part — the reactive pipelines —
//! lives in the crate root; the async endpoints here only consume it.
//!
//! Built to sit behind a reverse proxy, so body-size limits, rate limiting,
//! slow-client protection, and TLS all belong to the proxy, not to this
//! module.

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod employee;

pub use error::{ApiError, Error};
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
