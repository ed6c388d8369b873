//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. You
//! register a path, you get a handler. That is all.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::rest::handler::{BoxedHandler, Handler};
use crate::rest::request::Request;
use crate::rest::response::Response;
use crate::rest::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::rest::Server::serve).
/// Each registration returns `self` so routes chain naturally.
pub struct Router {
    routes: HashMap<http::Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Registers a handler for a method + path pair. Path parameters use
    /// `{name}` syntax — `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or conflicting route pattern; routes are
    /// registered at startup, so this fails fast rather than at request time.
    pub fn on(mut self, method: http::Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(http::Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(http::Method::POST, path, handler)
    }

    /// Routes one request to its handler and produces the response; unmatched
    /// paths produce a 404. This is the whole dispatch path — the server
    /// calls it per request, and tests call it directly without a socket.
    pub async fn route(&self, req: Request) -> Response {
        match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => handler.call(req.with_params(params)).await,
            None => Response::status(Status::NotFound),
        }
    }

    fn lookup(
        &self,
        method: &http::Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
