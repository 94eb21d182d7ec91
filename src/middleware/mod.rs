//! Handler chain — the synchronous middleware contract shared by providers.
//!
//! Every route registered through the adapter layer carries an ordered list of
//! handlers. Each handler receives the request, the response under
//! construction, and a [`Next`] cursor; calling [`Next::run`] advances to the
//! following handler. The adapter base never runs a chain over the network —
//! providers do — but the chain shape is fixed here so handlers written
//! against one provider work against any other.
//!
//! ## Core types
//!
//! - [`Handler`] — type-erased, cheaply-cloneable handler function.
//! - [`Next`] — cursor into the remaining chain; consumed on each call.
//! - [`handler`] — converts a closure into a [`Handler`].
//! - [`body_parser`] — the base pass-through parser middleware.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http::{Request, Response};

/// A type-erased, reference-counted handler function.
///
/// Every entry in a handler chain is stored as a `Handler`. The [`Arc`]
/// wrapper makes handlers cheap to clone so that [`Next`] can advance through
/// the chain without copying closures.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use portico::middleware::{Handler, Next};
/// use portico::http::{Request, Response};
///
/// let passthrough: Handler = Arc::new(|req: &mut Request, res: &mut Response, next: Next| {
///     next.run(req, res);
/// });
/// ```
pub type Handler = Arc<dyn Fn(&mut Request, &mut Response, Next) + Send + Sync + 'static>;

/// Converts a closure into a [`Handler`].
///
/// Purely a readability helper — `Arc::new` on the closure does the same.
///
/// # Examples
///
/// ```
/// use portico::middleware::handler;
///
/// let h = handler(|_req, res, _next| {
///     res.set_status(204);
/// });
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Request, &mut Response, Next) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A cursor into the remaining handler chain for a single dispatch.
///
/// `Next` is passed to each handler. Calling [`Next::run`] advances the
/// cursor by one position and invokes the next handler synchronously, inline,
/// before returning. A handler that does not call `run` short-circuits the
/// chain; an exhausted chain simply returns, leaving the response as the
/// handlers left it.
///
/// `Next` is consumed by [`run`](Self::run), so it cannot be called more than
/// once per handler invocation.
pub struct Next {
    chain: Vec<Handler>,
    // Position of the handler to invoke on the next `run` call.
    index: usize,
}

impl Next {
    /// Creates a `Next` positioned at the start of the given chain.
    pub fn new(chain: Vec<Handler>) -> Self {
        Self { chain, index: 0 }
    }

    /// Invokes the next handler in the chain, if any.
    pub fn run(mut self, request: &mut Request, response: &mut Response) {
        if self.index < self.chain.len() {
            let current = self.chain[self.index].clone();
            self.index += 1;
            current(request, response, self);
        }
    }

    /// Number of handlers not yet invoked.
    pub fn remaining(&self) -> usize {
        self.chain.len() - self.index
    }
}

/// Options accepted by [`body_parser`].
///
/// The base parser ignores every field; they exist so providers that perform
/// real parsing share one configuration shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParserOptions {
    /// Upper bound on accepted body size, in bytes. `None` means provider default.
    pub max_body_size: Option<usize>,
    /// Content types the parser should attempt to decode.
    pub content_types: Vec<String>,
}

/// Returns the base body-parser middleware: a handler that unconditionally
/// advances the chain and performs no parsing.
///
/// `options` are accepted for signature parity with providers that parse, and
/// are unused here.
///
/// # Examples
///
/// ```
/// use portico::middleware::{body_parser, BodyParserOptions, Next};
/// use portico::http::{Method, Request, Response};
///
/// let parser = body_parser(BodyParserOptions::default());
/// let mut req = Request::new(Method::Post, "/x");
/// let mut res = Response::new();
/// parser(&mut req, &mut res, Next::new(vec![]));
/// ```
pub fn body_parser(_options: BodyParserOptions) -> Handler {
    Arc::new(|request: &mut Request, response: &mut Response, next: Next| {
        next.run(request, response);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn exchange() -> (Request, Response) {
        (Request::new(Method::Get, "/t"), Response::new())
    }

    #[test]
    fn empty_chain_is_a_no_op() {
        let (mut req, mut res) = exchange();
        Next::new(vec![]).run(&mut req, &mut res);
        assert_eq!(res.status(), 200);
    }

    #[test]
    fn chain_runs_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let first = {
            let order = order.clone();
            handler(move |req, res, next| {
                order.lock().unwrap().push("first");
                next.run(req, res);
            })
        };
        let second = {
            let order = order.clone();
            handler(move |_req, _res, _next| {
                order.lock().unwrap().push("second");
            })
        };

        let (mut req, mut res) = exchange();
        Next::new(vec![first, second]).run(&mut req, &mut res);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn handler_can_short_circuit() {
        let reached = Arc::new(AtomicUsize::new(0));

        let gate = handler(|_req, res, _next| {
            // Never calls next.
            res.set_status(401);
        });
        let downstream = {
            let reached = reached.clone();
            handler(move |_req, _res, _next| {
                reached.fetch_add(1, Ordering::SeqCst);
            })
        };

        let (mut req, mut res) = exchange();
        Next::new(vec![gate, downstream]).run(&mut req, &mut res);
        assert_eq!(res.status(), 401);
        assert_eq!(reached.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn body_parser_advances_without_touching_messages() {
        let reached = Arc::new(AtomicUsize::new(0));
        let probe = {
            let reached = reached.clone();
            handler(move |_req, _res, _next| {
                reached.fetch_add(1, Ordering::SeqCst);
            })
        };

        let parser = body_parser(BodyParserOptions::default());
        let (mut req, mut res) = exchange();
        Next::new(vec![parser, probe]).run(&mut req, &mut res);

        assert_eq!(reached.load(Ordering::SeqCst), 1);
        assert_eq!(res.status(), 200);
        assert_eq!(req.payload_value(), &serde_json::Value::Null);
    }

    #[test]
    fn parser_options_deserialize() {
        let opts: BodyParserOptions =
            serde_json::from_str(r#"{"max_body_size": 1024}"#).unwrap();
        assert_eq!(opts.max_body_size, Some(1024));
        assert!(opts.content_types.is_empty());
    }
}
