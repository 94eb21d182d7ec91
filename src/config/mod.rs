//! Adapter construction options.
//!
//! The enclosing service registry hands each adapter a JSON configuration
//! object at construction time. [`AdapterOptions`] is the typed view of the
//! keys this layer recognizes; unrecognized keys are ignored so registries can
//! carry provider-specific settings in the same object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options recognized by the adapter layer at construction time.
///
/// # Examples
///
/// ```
/// use portico::config::AdapterOptions;
/// use serde_json::json;
///
/// let opts = AdapterOptions::from_value(json!({"ServicePort": 8080})).unwrap();
/// assert_eq!(opts.service_port, Some(8080));
///
/// let opts = AdapterOptions::from_value(json!({})).unwrap();
/// assert_eq!(opts.service_port, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    /// Port the adapter declares it will listen on. Absent means the port is
    /// chosen at `listen` time (or the provider is virtual and has none).
    #[serde(rename = "ServicePort", skip_serializing_if = "Option::is_none")]
    pub service_port: Option<u16>,
}

impl AdapterOptions {
    /// Parses options from a registry-supplied JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns the underlying deserialization error when a recognized key has
    /// the wrong shape (e.g. a non-numeric `ServicePort`).
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
