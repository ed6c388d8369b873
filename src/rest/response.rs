//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it. That is the entire
//! job description.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::rest::error::ApiError;
use crate::rest::status::Status;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use brook::rest::{Response, Status};
///
/// Response::text("hello");
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::status(Status::NoContent);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use brook::rest::{Response, Status};
///
/// Response::builder()
///     .status(Status::Created)
///     .header("x-cheese", "Camembert")
///     .cookie("Flavour", "chocolate")
///     .text("Hello, World!");
/// ```
pub struct Response {
    status: Status,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// `200 OK` — `application/json`. Pass bytes from your serialiser
    /// directly: `serde_json::to_vec(&val)?`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::with_content_type("application/json", body)
    }

    /// `200 OK` — `application/json`, serialising `value` in place. A
    /// serialisation error degrades to a 500, never a panic.
    pub fn json_value<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::json(bytes),
            Err(e) => {
                error!("response serialisation failed: {e}");
                Self::status(Status::InternalServerError)
            }
        }
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_content_type("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Response with no body.
    pub fn status(status: Status) -> Self {
        Self { status, headers: Vec::new(), body: Vec::new() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: Status::Ok, headers: Vec::new() }
    }

    fn with_content_type(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            body,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    /// Case-insensitive header lookup over the headers set so far.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn into_hyper(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(http::StatusCode::from(self.status));
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder.body(Full::new(Bytes::from(self.body))).unwrap_or_else(|e| {
            error!("invalid response metadata: {e}");
            http::Response::builder()
                .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::new()))
                .expect("bare 500 response is always valid")
        })
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok`. Terminated
/// by a typed body method — you always know what you're sending.
pub struct ResponseBuilder {
    status: Status,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Sends a `set-cookie` header for a session-scoped cookie.
    pub fn cookie(self, name: &str, value: &str) -> Self {
        let cookie = format!("{name}={value}");
        self.header("set-cookie", &cookie)
    }

    /// Sets the `expires` response header (IMF-fixdate, RFC 9110 §5.6.7).
    pub fn expires(self, at: DateTime<Utc>) -> Self {
        let stamp = at.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        self.header("expires", &stamp)
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish("application/json", body)
    }

    /// Terminate with a JSON body serialised in place.
    pub fn json_value<T: Serialize>(self, value: &T) -> Response {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.json(bytes),
            Err(e) => {
                error!("response serialisation failed: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Vec::new() }
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { status: self.status, headers, body }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`]. Implemented for everything a
/// handler may return, including `Result<_, ApiError>` — the `Err` branch is
/// where the error taxonomy gets mapped to a status code.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

/// Return a [`Status`] directly from a handler.
impl IntoResponse for Status {
    fn into_response(self) -> Response {
        Response::status(self)
    }
}

impl<R: IntoResponse> IntoResponse for Result<R, ApiError> {
    fn into_response(self) -> Response {
        match self {
            Ok(r) => r.into_response(),
            Err(e) => e.into_response(),
        }
    }
}
