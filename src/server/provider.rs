//! The provider contract — hooks a concrete HTTP backend implements.

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::http::{Method, Response};
use crate::middleware::{BodyParserOptions, Handler, body_parser};

/// Options for static-file serving, shared across providers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticOptions {
    /// Directory to serve files from.
    pub directory: PathBuf,
    /// File served when the request maps to a directory.
    pub index_file: Option<String>,
}

impl StaticOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            index_file: None,
        }
    }
}

/// Hooks a concrete HTTP backend plugs into [`ServiceServer`](super::ServiceServer).
///
/// Every method has a harmless default, so a provider only implements what its
/// backend actually supports. The wrapper validates inputs before any `do_*`
/// hook runs; hooks may assume the route string already passed
/// [`validate_route`](super::validate_route) and should return `false` only
/// when the backend itself refuses the registration.
///
/// # Examples
///
/// ```
/// use portico::server::ServiceProvider;
/// use portico::middleware::Handler;
///
/// struct Counting {
///     routes: usize,
/// }
///
/// impl ServiceProvider for Counting {
///     fn kind(&self) -> &'static str {
///         "Counting"
///     }
///
///     fn do_get(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
///         self.routes += 1;
///         true
///     }
/// }
/// ```
pub trait ServiceProvider {
    /// Tag identifying the concrete backend, e.g. for registry diagnostics.
    fn kind(&self) -> &'static str {
        "Base"
    }

    /// Called when the wrapper starts listening. The port is the wrapper's
    /// effective port, explicit argument winning over configured value.
    /// Must not fail; backends that can fail to bind surface that through
    /// their own construction path.
    fn on_listen(&mut self, _port: Option<u16>) {}

    /// Called when the wrapper stops listening. Must not fail.
    fn on_close(&mut self) {}

    /// Registers a GET route against the backend.
    fn do_get(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
        true
    }

    /// Registers a PUT route against the backend.
    fn do_put(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
        true
    }

    /// Registers a POST route against the backend.
    fn do_post(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
        true
    }

    /// Registers a DELETE route against the backend.
    fn do_delete(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
        true
    }

    /// Registers a PATCH route against the backend.
    fn do_patch(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
        true
    }

    /// Registers an OPTIONS route against the backend.
    fn do_options(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
        true
    }

    /// Registers a HEAD route against the backend.
    ///
    /// Note: [`ServiceServer::head`](super::ServiceServer::head) never calls
    /// this hook. Providers that register HEAD routes for real must expose
    /// their own entry point.
    fn do_head(&mut self, _route: &str, _handlers: Vec<Handler>) -> bool {
        true
    }

    /// Receives a global handler applied ahead of every route. The handler's
    /// shape is already guaranteed by the type system; the default discards it.
    fn do_use(&mut self, _handler: Handler) -> bool {
        true
    }

    /// Produces the body-parsing middleware this backend prepends in the
    /// `*_with_body_parser` registrations. The default parses nothing and
    /// passes straight through.
    fn body_parser(&self, options: BodyParserOptions) -> Handler {
        body_parser(options)
    }

    /// Serves static files from a directory under `route`.
    fn serve_static(&mut self, route: &str, _options: &StaticOptions) -> bool {
        debug!(
            "static serving for route [{}] is not implemented by the {} provider",
            route,
            self.kind()
        );
        false
    }

    /// Dispatches `data` through the handlers registered for `route` without
    /// touching the network, reporting the finished response via `callback`.
    /// The default implements no programmatic invocation: it logs, never
    /// invokes the callback, and returns `false`.
    fn invoke(
        &mut self,
        _method: Method,
        route: &str,
        data: Value,
        _callback: impl FnOnce(Response),
    ) -> bool {
        debug!(
            ?data,
            "invoke for route [{}] landed on the {} provider, which does not implement programmatic invocation",
            route,
            self.kind()
        );
        false
    }
}

/// The trivial provider: every hook keeps its default.
///
/// Useful on its own for exercising caller code against the adapter contract
/// without a real backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseProvider;

impl ServiceProvider for BaseProvider {}
