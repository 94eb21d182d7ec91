//! # portico
//!
//! A pluggable service-server adapter layer: one lifecycle + routing surface
//! over swappable HTTP backends.
//!
//! Callers program against [`ServiceServer`]; a backend plugs in by
//! implementing [`ServiceProvider`]. The crate ships [`BaseProvider`], whose
//! hooks are all harmless defaults, so the adapter contract can be exercised
//! (and caller code tested) with no real server behind it. Everything here is
//! synchronous and callback-style — lifecycle callbacks run inline before
//! `listen`/`close` return, and no network I/O or body parsing happens in
//! this layer.
//!
//! ## Quick Start
//!
//! ```rust
//! use portico::{AdapterOptions, ServiceServer};
//! use portico::middleware::handler;
//!
//! let mut server = ServiceServer::base("Widgets", AdapterOptions::default());
//!
//! server.get("/widgets", vec![handler(|_req, res, _next| {
//!     res.set_status(200);
//! })]);
//!
//! server.listen(Some(8080), |s| {
//!     println!("{} listening on port {:?}", s.name(), s.port());
//! });
//! server.close(|_s| {});
//! ```

pub mod config;
pub mod http;
pub mod middleware;
pub mod server;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use config::AdapterOptions;
pub use http::{Method, Request, Response};
pub use middleware::{Handler, Next};
pub use server::{BaseProvider, RouteError, ServiceProvider, ServiceServer, StaticOptions};
