//! The request side of the handler contract.

use std::collections::HashMap;

use serde_json::Value;

use super::Method;

/// A request as seen by handlers in the adapter layer.
///
/// Providers that wrap a real HTTP library translate their native request
/// into this shape before running a handler chain; programmatic
/// [`invoke`](crate::server::ServiceServer::invoke) constructs one directly.
/// No parsing happens here — the payload is whatever the caller attached.
///
/// # Examples
///
/// ```
/// use portico::http::{Method, Request};
/// use serde_json::json;
///
/// let request = Request::new(Method::Post, "/widgets")
///     .header("Content-Type", "application/json")
///     .payload(json!({"name": "sprocket"}));
///
/// assert_eq!(request.path(), "/widgets");
/// assert_eq!(request.header_value("content-type"), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    // Header names are stored lowercased for case-insensitive lookup.
    headers: HashMap<String, String>,
    payload: Value,
}

impl Request {
    /// Creates a request for the given method and path with no headers and a
    /// null payload.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            payload: Value::Null,
        }
    }

    /// Sets a header, replacing any previous value for the same name.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Attaches a payload value.
    #[must_use]
    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up a header by name, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The raw payload attached to this request.
    pub fn payload_value(&self) -> &Value {
        &self.payload
    }

    /// Deserializes the payload into a concrete type.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(self.payload.clone())
    }
}
