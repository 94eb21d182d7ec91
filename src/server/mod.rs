//! The service-server adapter — uniform lifecycle and routing over swappable
//! HTTP backends.
//!
//! [`ServiceServer`] is the surface callers program against: lifecycle control
//! ([`listen`](ServiceServer::listen) / [`close`](ServiceServer::close)),
//! global middleware registration, and per-verb route mapping. It owns the
//! adapter state (product name, declared port, registry hash, active flag) and
//! applies route validation, then delegates the real work to a
//! [`ServiceProvider`] — the pluggable strategy a concrete backend implements.
//!
//! [`BaseProvider`] supplies harmless defaults for every hook, so the wrapper
//! is fully instantiable and testable with no backend at all:
//!
//! ```
//! use portico::server::ServiceServer;
//! use portico::config::AdapterOptions;
//! use portico::middleware::handler;
//!
//! let mut server = ServiceServer::base("Widgets", AdapterOptions::default());
//!
//! assert!(server.get("/widgets", vec![handler(|_req, res, _next| {
//!     res.set_status(200);
//! })]));
//!
//! server.listen(Some(8080), |s| assert!(s.is_active()));
//! server.close(|s| assert!(!s.is_active()));
//! ```
//!
//! Failure semantics are deliberately boolean: a registration either reaches
//! the provider hook and returns its verdict, or fails route validation, in
//! which case one error is logged naming the verb and the method returns
//! `false`. Nothing at this surface panics or returns `Result`.

use serde_json::Value;
use tracing::error;

use crate::config::AdapterOptions;
use crate::http::{Method, Response};
use crate::middleware::{BodyParserOptions, Handler};

mod provider;
mod validate;

pub use provider::{BaseProvider, ServiceProvider, StaticOptions};
pub use validate::{RouteError, validate_route};

/// An HTTP service server: adapter state plus a pluggable backend.
///
/// Created by the enclosing service registry with a product name, a
/// configuration object, and an optional identifying hash the registry uses
/// for later lookup. The adapter starts out inactive; only
/// [`listen`](Self::listen) and [`close`](Self::close) move the active flag.
pub struct ServiceServer<P: ServiceProvider> {
    provider: P,
    name: String,
    port: Option<u16>,
    hash: Option<String>,
    active: bool,
}

impl ServiceServer<BaseProvider> {
    /// Creates an adapter backed by [`BaseProvider`] — no real backend, every
    /// hook a harmless default.
    pub fn base(product: impl Into<String>, options: AdapterOptions) -> Self {
        Self::new(BaseProvider, product, options)
    }
}

impl<P: ServiceProvider> ServiceServer<P> {
    /// Tag under which the enclosing registry files adapters of this type.
    pub const SERVICE_TYPE: &'static str = "ServiceServer";

    /// Creates an adapter wrapping `provider`.
    ///
    /// `options.service_port` becomes the declared listen port; an absent key
    /// leaves it unset until [`listen`](Self::listen) supplies one.
    pub fn new(provider: P, product: impl Into<String>, options: AdapterOptions) -> Self {
        Self {
            provider,
            name: product.into(),
            port: options.service_port,
            hash: None,
            active: false,
        }
    }

    /// Attaches the identifying hash the external registry looks this
    /// adapter up by. Stored verbatim.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Product name this adapter serves.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared listen port, if any.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Registry hash, if one was attached.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// The backend's kind tag (`"Base"` for [`BaseProvider`]).
    pub fn kind(&self) -> &'static str {
        self.provider.kind()
    }

    /// `true` while the adapter considers itself listening.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Shared access to the backend.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Exclusive access to the backend, for provider-specific configuration
    /// the adapter contract does not cover.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Starts listening: records an explicitly supplied port, marks the
    /// adapter active, notifies the backend, and invokes `ready` inline with
    /// `&self`, returning its result.
    ///
    /// There is no failure path and no deferral — `ready` has run by the time
    /// `listen` returns, and repeated calls simply re-assert the active state.
    pub fn listen<R>(&mut self, port: Option<u16>, ready: impl FnOnce(&Self) -> R) -> R {
        if port.is_some() {
            self.port = port;
        }
        self.active = true;
        self.provider.on_listen(self.port);
        ready(self)
    }

    /// Stops listening: marks the adapter inactive, notifies the backend, and
    /// invokes `stopped` inline with `&self`, returning its result.
    ///
    /// Like [`listen`](Self::listen), unconditional and idempotent in effect.
    pub fn close<R>(&mut self, stopped: impl FnOnce(&Self) -> R) -> R {
        self.active = false;
        self.provider.on_close();
        stopped(self)
    }

    // ── Global middleware ─────────────────────────────────────────────────────

    /// Registers a global handler applied ahead of every route.
    ///
    /// The `(request, response, next)` shape is enforced by the [`Handler`]
    /// type itself, so there is nothing left to validate here; the call
    /// returns the backend's verdict, which for [`BaseProvider`] is always
    /// `true`.
    pub fn use_handler(&mut self, handler: Handler) -> bool {
        self.provider.do_use(handler)
    }

    // ── Route registration ────────────────────────────────────────────────────

    // Validation composed over the provider hook: every verb funnels through
    // here so the failure behavior cannot drift between verbs.
    fn checked<F>(&mut self, method: Method, route: &str, register: F) -> bool
    where
        F: FnOnce(&mut P) -> bool,
    {
        match validate_route(route) {
            Ok(()) => register(&mut self.provider),
            Err(err) => {
                error!("{} route mapping failed for [{}]: {}", method, route, err);
                false
            }
        }
    }

    /// Registers a GET route. Returns the hook's verdict, or `false` (with
    /// one logged error) when the route string is rejected.
    pub fn get(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.checked(Method::Get, route, |p| p.do_get(route, handlers))
    }

    /// Registers a PUT route. Same contract as [`get`](Self::get).
    pub fn put(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.checked(Method::Put, route, |p| p.do_put(route, handlers))
    }

    /// Registers a POST route. Same contract as [`get`](Self::get).
    pub fn post(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.checked(Method::Post, route, |p| p.do_post(route, handlers))
    }

    /// Registers a DELETE route. Same contract as [`get`](Self::get).
    pub fn delete(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.checked(Method::Delete, route, |p| p.do_delete(route, handlers))
    }

    /// Registers a PATCH route. Same contract as [`get`](Self::get).
    pub fn patch(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.checked(Method::Patch, route, |p| p.do_patch(route, handlers))
    }

    /// Registers an OPTIONS route. Same contract as [`get`](Self::get).
    pub fn options(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.checked(Method::Options, route, |p| p.do_options(route, handlers))
    }

    /// Registers a HEAD route — with a long-standing asymmetry: the route is
    /// validated like every other verb, but on success this returns `true`
    /// directly without calling [`ServiceProvider::do_head`]. Callers must
    /// not assume parity with the other six verbs; backends that register
    /// HEAD routes for real expose their own entry point.
    pub fn head(&mut self, route: &str, _handlers: Vec<Handler>) -> bool {
        self.checked(Method::Head, route, |_p| true)
    }

    // ── Route registration with body parsing ──────────────────────────────────

    fn parser_chain(&self, handlers: Vec<Handler>) -> Vec<Handler> {
        let mut chain = Vec::with_capacity(handlers.len() + 1);
        chain.push(self.provider.body_parser(BodyParserOptions::default()));
        chain.extend(handlers);
        chain
    }

    /// Registers a GET route with the backend's body parser prepended, so the
    /// hook receives `handlers.len() + 1` handlers with the parser first.
    /// Inherits [`get`](Self::get)'s validation behavior.
    pub fn get_with_body_parser(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        let chain = self.parser_chain(handlers);
        self.get(route, chain)
    }

    /// Registers a PUT route with the body parser prepended.
    pub fn put_with_body_parser(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        let chain = self.parser_chain(handlers);
        self.put(route, chain)
    }

    /// Registers a POST route with the body parser prepended.
    pub fn post_with_body_parser(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        let chain = self.parser_chain(handlers);
        self.post(route, chain)
    }

    /// Registers a DELETE route with the body parser prepended.
    pub fn delete_with_body_parser(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        let chain = self.parser_chain(handlers);
        self.delete(route, chain)
    }

    /// Registers a PATCH route with the body parser prepended.
    pub fn patch_with_body_parser(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        let chain = self.parser_chain(handlers);
        self.patch(route, chain)
    }

    /// Registers an OPTIONS route with the body parser prepended.
    pub fn options_with_body_parser(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        let chain = self.parser_chain(handlers);
        self.options(route, chain)
    }

    /// Registers a HEAD route with the body parser prepended. Inherits the
    /// [`head`](Self::head) asymmetry: the chain never reaches a hook.
    pub fn head_with_body_parser(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        let chain = self.parser_chain(handlers);
        self.head(route, chain)
    }

    // ── Backend pass-throughs ─────────────────────────────────────────────────

    /// Serves static files from a directory under `route`. The base backend
    /// logs at debug level and returns `false`.
    pub fn serve_static(&mut self, route: &str, options: &StaticOptions) -> bool {
        self.provider.serve_static(route, options)
    }

    /// Dispatches `data` through the handlers registered for `route`,
    /// bypassing the network, reporting the finished response via `callback`.
    /// The base backend logs at debug level, never invokes `callback`, and
    /// returns `false`.
    pub fn invoke(
        &mut self,
        method: Method,
        route: &str,
        data: Value,
        callback: impl FnOnce(Response),
    ) -> bool {
        self.provider.invoke(method, route, data, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;
    use crate::middleware::{Next, handler};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Provider that records every hook call and answers with a configurable
    // verdict, stashing handler chains for inspection.
    struct Recording {
        verdict: bool,
        calls: Vec<(Method, String)>,
        chains: Vec<Vec<Handler>>,
        used: usize,
        listens: Vec<Option<u16>>,
        closes: usize,
    }

    impl Recording {
        fn answering(verdict: bool) -> Self {
            Self {
                verdict,
                calls: Vec::new(),
                chains: Vec::new(),
                used: 0,
                listens: Vec::new(),
                closes: 0,
            }
        }

        fn record(&mut self, method: Method, route: &str, handlers: Vec<Handler>) -> bool {
            self.calls.push((method, route.to_owned()));
            self.chains.push(handlers);
            self.verdict
        }
    }

    impl ServiceProvider for Recording {
        fn kind(&self) -> &'static str {
            "Recording"
        }

        fn on_listen(&mut self, port: Option<u16>) {
            self.listens.push(port);
        }

        fn on_close(&mut self) {
            self.closes += 1;
        }

        fn do_get(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
            self.record(Method::Get, route, handlers)
        }

        fn do_put(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
            self.record(Method::Put, route, handlers)
        }

        fn do_post(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
            self.record(Method::Post, route, handlers)
        }

        fn do_delete(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
            self.record(Method::Delete, route, handlers)
        }

        fn do_patch(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
            self.record(Method::Patch, route, handlers)
        }

        fn do_options(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
            self.record(Method::Options, route, handlers)
        }

        fn do_head(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
            self.record(Method::Head, route, handlers)
        }

        fn do_use(&mut self, _handler: Handler) -> bool {
            self.used += 1;
            self.verdict
        }
    }

    fn recording_server(verdict: bool) -> ServiceServer<Recording> {
        ServiceServer::new(
            Recording::answering(verdict),
            "TestProduct",
            AdapterOptions::default(),
        )
    }

    fn noop() -> Handler {
        handler(|_req, _res, _next| {})
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn constructed_from_options_with_port() {
        let opts = AdapterOptions::from_value(json!({"ServicePort": 8080})).unwrap();
        let server = ServiceServer::base("Widgets", opts);
        assert_eq!(server.port(), Some(8080));
        assert_eq!(server.name(), "Widgets");
        assert_eq!(server.kind(), "Base");
        assert!(!server.is_active());
    }

    #[test]
    fn constructed_without_port_leaves_it_unset() {
        let opts = AdapterOptions::from_value(json!({})).unwrap();
        let server = ServiceServer::base("Widgets", opts);
        assert_eq!(server.port(), None);
    }

    #[test]
    fn hash_is_stored_verbatim() {
        let server = ServiceServer::base("Widgets", AdapterOptions::default())
            .with_hash("SimpleService-123");
        assert_eq!(server.hash(), Some("SimpleService-123"));
        assert_eq!(ServiceServer::<BaseProvider>::SERVICE_TYPE, "ServiceServer");
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    #[test]
    fn listen_sets_active_before_ready_runs() {
        let mut server = recording_server(true);
        assert!(!server.is_active());

        let observed = server.listen(None, |s| s.is_active());
        assert!(observed);
        assert!(server.is_active());
    }

    #[test]
    fn explicit_port_wins_over_configured() {
        let opts = AdapterOptions::from_value(json!({"ServicePort": 8080})).unwrap();
        let mut server = ServiceServer::new(Recording::answering(true), "P", opts);

        server.listen(Some(9090), |s| assert_eq!(s.port(), Some(9090)));
        assert_eq!(server.provider().listens, vec![Some(9090)]);
    }

    #[test]
    fn listen_without_port_keeps_configured() {
        let opts = AdapterOptions::from_value(json!({"ServicePort": 8080})).unwrap();
        let mut server = ServiceServer::new(Recording::answering(true), "P", opts);

        server.listen(None, |s| assert_eq!(s.port(), Some(8080)));
    }

    #[test]
    fn close_clears_active_before_stopped_runs() {
        let mut server = recording_server(true);
        server.listen(None, |_s| {});

        let observed = server.close(|s| s.is_active());
        assert!(!observed);
        assert!(!server.is_active());
        assert_eq!(server.provider().closes, 1);
    }

    #[test]
    fn lifecycle_is_repeatable_in_any_order() {
        let mut server = recording_server(true);
        server.close(|s| assert!(!s.is_active()));
        server.listen(None, |s| assert!(s.is_active()));
        server.listen(None, |s| assert!(s.is_active()));
        server.close(|s| assert!(!s.is_active()));
        server.close(|s| assert!(!s.is_active()));
    }

    #[test]
    fn listen_returns_ready_result() {
        let mut server = recording_server(true);
        let answer = server.listen(None, |_s| 41 + 1);
        assert_eq!(answer, 42);
    }

    // ── Global middleware ─────────────────────────────────────────────────────

    #[test]
    fn use_handler_reaches_the_hook() {
        let mut server = recording_server(true);
        assert!(server.use_handler(noop()));
        assert_eq!(server.provider().used, 1);
    }

    #[test]
    fn use_handler_surfaces_hook_verdict() {
        let mut server = recording_server(false);
        assert!(!server.use_handler(noop()));
    }

    #[test]
    fn base_provider_accepts_any_handler() {
        let mut server = ServiceServer::base("P", AdapterOptions::default());
        assert!(server.use_handler(noop()));
    }

    // ── Route registration ────────────────────────────────────────────────────

    #[test]
    fn invalid_route_fails_every_verb_without_reaching_hooks() {
        let mut server = recording_server(true);

        for bad in ["", "users", "/us ers", "/line\nbreak"] {
            assert!(!server.get(bad, vec![noop()]));
            assert!(!server.put(bad, vec![noop()]));
            assert!(!server.post(bad, vec![noop()]));
            assert!(!server.delete(bad, vec![noop()]));
            assert!(!server.patch(bad, vec![noop()]));
            assert!(!server.options(bad, vec![noop()]));
            assert!(!server.head(bad, vec![noop()]));
        }

        assert!(server.provider().calls.is_empty());
    }

    #[test]
    fn valid_route_returns_hook_verdict() {
        let mut accepted = recording_server(true);
        assert!(accepted.get("/users", vec![noop()]));
        assert_eq!(accepted.provider().calls, vec![(Method::Get, "/users".to_owned())]);

        let mut refused = recording_server(false);
        assert!(!refused.get("/users", vec![noop()]));
        assert_eq!(refused.provider().calls.len(), 1);
    }

    #[test]
    fn each_verb_reaches_its_own_hook() {
        let mut server = recording_server(true);
        assert!(server.put("/r", vec![]));
        assert!(server.post("/r", vec![]));
        assert!(server.delete("/r", vec![]));
        assert!(server.patch("/r", vec![]));
        assert!(server.options("/r", vec![]));

        let verbs: Vec<Method> = server.provider().calls.iter().map(|c| c.0).collect();
        assert_eq!(
            verbs,
            vec![
                Method::Put,
                Method::Post,
                Method::Delete,
                Method::Patch,
                Method::Options
            ]
        );
    }

    #[test]
    fn head_returns_true_but_never_reaches_do_head() {
        // The preserved asymmetry: validation passes, the hook stays silent.
        let mut server = recording_server(false);
        assert!(server.head("/resource", vec![noop()]));
        assert!(server.provider().calls.is_empty());
    }

    // ── Body-parser registration ──────────────────────────────────────────────

    #[test]
    fn with_body_parser_prepends_one_handler() {
        let mut server = recording_server(true);
        assert!(server.post_with_body_parser("/widgets", vec![noop(), noop()]));

        let chain = &server.provider().chains[0];
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn prepended_parser_is_a_pass_through() {
        let mut server = recording_server(true);
        server.get_with_body_parser("/widgets", vec![noop()]);

        let parser = server.provider().chains[0][0].clone();
        let reached = Arc::new(AtomicUsize::new(0));
        let probe = {
            let reached = reached.clone();
            handler(move |_req, _res, _next| {
                reached.fetch_add(1, Ordering::SeqCst);
            })
        };

        let mut req = Request::new(Method::Get, "/widgets");
        let mut res = Response::new();
        parser(&mut req, &mut res, Next::new(vec![probe]));

        assert_eq!(reached.load(Ordering::SeqCst), 1);
        assert_eq!(req.payload_value(), &serde_json::Value::Null);
    }

    #[test]
    fn with_body_parser_still_validates_routes() {
        let mut server = recording_server(true);
        assert!(!server.put_with_body_parser("no-slash", vec![noop()]));
        assert!(server.provider().chains.is_empty());
    }

    #[test]
    fn head_with_body_parser_inherits_the_asymmetry() {
        let mut server = recording_server(true);
        assert!(server.head_with_body_parser("/resource", vec![noop()]));
        assert!(server.provider().calls.is_empty());
    }

    // ── Base stubs ────────────────────────────────────────────────────────────

    #[test]
    fn base_serve_static_declines() {
        let mut server = ServiceServer::base("P", AdapterOptions::default());
        let options = StaticOptions::new("/var/www");
        assert!(!server.serve_static("/static/*", &options));
    }

    #[test]
    fn base_invoke_declines_without_calling_back() {
        let mut server = ServiceServer::base("P", AdapterOptions::default());
        let called = Arc::new(AtomicUsize::new(0));
        let observed = called.clone();

        let outcome = server.invoke(Method::Get, "/x", json!({"k": 1}), move |_res| {
            observed.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!outcome);
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }
}
