//! Error types: infrastructure failures and the endpoint error taxonomy.

use thiserror::Error;

use crate::failure::Failure;
use crate::rest::response::{IntoResponse, Response};
use crate::rest::status::Status;

/// The error type returned by the server's fallible operations.
///
/// Endpoint-level errors (400, 404, …) are expressed as [`ApiError`] values
/// and mapped to responses; this type surfaces infrastructure failures such
/// as binding to a port or accepting a connection.
#[derive(Debug, Error)]
#[error("io: {0}")]
pub struct Error(#[from] std::io::Error);

/// The endpoint error taxonomy, mapped at the boundary to a fixed status
/// code with the triggering message as the plain-text body.
///
/// Handlers return `Result<impl IntoResponse, ApiError>`; the dispatch path
/// converts the `Err` branch through [`IntoResponse`], so hyper never sees
/// an error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input — a blank query parameter, an unparseable body. → 400
    #[error("{0}")]
    Validation(String),
    /// A named resource is absent. → 404
    #[error("{0}")]
    NotFound(String),
    /// Anything the endpoint could not recover from. → 500
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::Internal(_) => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Response::builder().status(self.status()).text(self.to_string())
    }
}

/// Request bodies are parsed with serde; a parse error is the caller's fault.
impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Validation(e.to_string())
    }
}

/// A failure surfacing from an awaited pipeline inside a handler.
impl From<Failure> for ApiError {
    fn from(e: Failure) -> Self {
        Self::Internal(e.to_string())
    }
}
