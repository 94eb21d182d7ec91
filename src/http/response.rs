//! The response side of the handler contract.

use std::collections::HashMap;

use serde_json::Value;

/// A response as assembled by handlers in the adapter layer.
///
/// Handlers mutate a `Response` in place as the chain runs; providers that
/// wrap a real HTTP library translate the finished value back into their
/// native response type. Serialization to the wire is the provider's job.
///
/// # Examples
///
/// ```
/// use portico::http::Response;
/// use serde_json::json;
///
/// let mut response = Response::new();
/// response.set_status(201);
/// response.set_header("Location", "/widgets/7");
/// response.set_json(&json!({"id": 7})).unwrap();
///
/// assert_eq!(response.status(), 201);
/// assert_eq!(response.header_value("location"), Some("/widgets/7"));
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    // Header names are stored lowercased for case-insensitive lookup.
    headers: HashMap<String, String>,
    body: Value,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates an empty `200 OK` response with a null body.
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: Value::Null,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Sets a header, replacing any previous value for the same name.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Looks up a header by name, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The body value accumulated so far.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Replaces the body with an arbitrary JSON value.
    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    /// Serializes `value` and stores it as the body, tagging the content type.
    pub fn set_json<T>(&mut self, value: &T) -> Result<(), serde_json::Error>
    where
        T: serde::Serialize,
    {
        self.body = serde_json::to_value(value)?;
        self.set_header("Content-Type", "application/json");
        Ok(())
    }
}
