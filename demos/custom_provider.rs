//! A toy in-memory provider showing what a real backend implements.
//!
//! Routes are recorded in a table; `invoke` dispatches a request through the
//! registered handler chain by exact-path match, entirely in process. A real
//! provider would register against its wrapped HTTP library instead.
//!
//! Run with: `cargo run --example custom_provider`

use portico::http::{Method, Request, Response};
use portico::middleware::{Handler, Next, handler};
use portico::server::{ServiceProvider, ServiceServer};
use portico::AdapterOptions;
use serde_json::{Value, json};
use tracing::info;

#[derive(Default)]
struct InMemoryProvider {
    routes: Vec<(Method, String, Vec<Handler>)>,
    globals: Vec<Handler>,
}

impl InMemoryProvider {
    fn register(&mut self, method: Method, route: &str, handlers: Vec<Handler>) -> bool {
        info!("registering {} [{}] with {} handler(s)", method, route, handlers.len());
        self.routes.push((method, route.to_owned(), handlers));
        true
    }
}

impl ServiceProvider for InMemoryProvider {
    fn kind(&self) -> &'static str {
        "InMemory"
    }

    fn on_listen(&mut self, port: Option<u16>) {
        info!("in-memory provider up (declared port {:?})", port);
    }

    fn do_get(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.register(Method::Get, route, handlers)
    }

    fn do_post(&mut self, route: &str, handlers: Vec<Handler>) -> bool {
        self.register(Method::Post, route, handlers)
    }

    fn do_use(&mut self, handler: Handler) -> bool {
        self.globals.push(handler);
        true
    }

    fn invoke(
        &mut self,
        method: Method,
        route: &str,
        data: Value,
        callback: impl FnOnce(Response),
    ) -> bool {
        let Some((_, _, handlers)) = self
            .routes
            .iter()
            .find(|(m, r, _)| *m == method && r == route)
        else {
            return false;
        };

        let mut chain = self.globals.clone();
        chain.extend(handlers.iter().cloned());

        let mut request = Request::new(method, route).payload(data);
        let mut response = Response::new();
        Next::new(chain).run(&mut request, &mut response);

        callback(response);
        true
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut server = ServiceServer::new(
        InMemoryProvider::default(),
        "WidgetWorks",
        AdapterOptions::default(),
    );

    server.use_handler(handler(|req, res, next| {
        res.set_header("X-Product", "WidgetWorks");
        let path = req.path().to_owned();
        next.run(req, res);
        info!("handled [{}] -> {}", path, res.status());
    }));

    server.post_with_body_parser(
        "/widgets",
        vec![handler(|req, res, _next| {
            res.set_status(201);
            res.set_json(&json!({"created": req.payload_value()}))
                .expect("payload is already JSON");
        })],
    );

    server.listen(Some(8080), |s| {
        info!("{} ({}) active: {}", s.name(), s.kind(), s.is_active());
    });

    server.invoke(
        Method::Post,
        "/widgets",
        json!({"name": "sprocket"}),
        |response| {
            info!("invoke answered {} with body {}", response.status(), response.body());
        },
    );

    server.close(|s| info!("{} stopped", s.name()));
}
