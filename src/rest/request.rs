//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;

/// An incoming HTTP request: method, path, query, headers, body, and the
/// path parameters filled in by the router.
///
/// Requests can also be built directly, which is how the endpoint tests and
/// demos drive handlers without a socket:
///
/// ```rust
/// use brook::rest::Request;
///
/// let req = Request::new(http::Method::GET, "/employee/sachin?age=5");
/// assert_eq!(req.query("age"), Some("5"));
/// ```
pub struct Request {
    method: http::Method,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from a method and a `path?query` string.
    pub fn new(method: http::Method, uri: &str) -> Self {
        let (path, raw_query) = match uri.split_once('?') {
            Some((p, q)) => (p, q),
            None => (uri, ""),
        };
        Self {
            method,
            path: path.to_owned(),
            query: parse_query(raw_query),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        let path = parts.uri.path().to_owned();
        let query = parse_query(parts.uri.query().unwrap_or(""));
        Self {
            method: parts.method,
            path,
            query,
            headers: parts.headers,
            body,
            params: HashMap::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &http::Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup; `None` for absent or non-UTF-8 values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a named query parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

/// `a=1&b=2` → map. Keys without `=` map to the empty string; the proxy in
/// front of this adapter is expected to have normalized the URI already.
fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_owned(), v.to_owned()),
            None => (pair.to_owned(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parsing_handles_missing_values() {
        let req = Request::new(http::Method::GET, "/employee/cheeses?cheese=&debug");
        assert_eq!(req.query("cheese"), Some(""));
        assert_eq!(req.query("debug"), Some(""));
        assert_eq!(req.query("absent"), None);
        assert_eq!(req.path(), "/employee/cheeses");
    }
}
