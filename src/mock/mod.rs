//! Stand-in for the remote analysis engine.
//!
//! A small synchronous HTTP server (`tiny_http`) that answers
//! `GET /analyze` with a canned [`Scenario`]. Launched via `aether mock`
//! (default `127.0.0.1:8000`, the client's default endpoint) for demos, and
//! via [`spawn`] on an ephemeral port in tests.

pub mod fixtures;

use std::io::Cursor;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

pub use fixtures::{Fixture, Scenario};

/// Path the client requests.
pub const ANALYZE_PATH: &str = "/analyze";

// ---------------------------------------------------------------------------
// Blocking server
// ---------------------------------------------------------------------------

/// Serve `scenario` on `addr` until the process is stopped.
pub fn serve(addr: &str, scenario: Scenario) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start mock engine on {addr}: {e}"))?;

    println!("mock Aether engine ({scenario}) at http://{addr}{ANALYZE_PATH}");
    println!("Press Ctrl+C to stop.\n");

    for request in server.incoming_requests() {
        handle_request(request, scenario, true);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Background server
// ---------------------------------------------------------------------------

/// A mock engine running on a background thread. Stopped on drop.
pub struct MockEngine {
    server: Arc<Server>,
    url: String,
    handle: Option<JoinHandle<()>>,
}

/// Start a quiet mock engine on an ephemeral loopback port.
pub fn spawn(scenario: Scenario) -> Result<MockEngine> {
    let server = Server::http("127.0.0.1:0")
        .map_err(|e| anyhow::anyhow!("failed to start mock engine: {e}"))?;
    let addr = server
        .server_addr()
        .to_ip()
        .context("mock engine is not listening on an IP address")?;

    let server = Arc::new(server);
    let worker = Arc::clone(&server);
    let handle = std::thread::spawn(move || {
        for request in worker.incoming_requests() {
            handle_request(request, scenario, false);
        }
    });

    Ok(MockEngine {
        server,
        url: format!("http://{addr}{ANALYZE_PATH}"),
        handle: Some(handle),
    })
}

impl MockEngine {
    /// Full URL of the analysis endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Base URL (scheme, host and port).
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches(ANALYZE_PATH)
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

fn handle_request(request: Request, scenario: Scenario, access_log: bool) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let response = route(&method, &url, scenario);
    let status = response.status_code().0;

    let _ = request.respond(response);

    if access_log {
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

/// Pick the response for a request.
pub fn route(method: &Method, url: &str, scenario: Scenario) -> Response<Cursor<Vec<u8>>> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, ANALYZE_PATH) => fixture_response(&scenario.fixture()),
        (_, ANALYZE_PATH) => json_response(405, r#"{"error": "method not allowed"}"#),
        (&Method::Get, "/health") => json_response(200, r#"{"ok": true}"#),
        _ => json_response(404, r#"{"error": "not found"}"#),
    }
}

fn fixture_response(fixture: &Fixture) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(fixture.body.as_bytes().to_vec())
        .with_header(content_type(fixture.content_type))
        .with_status_code(StatusCode(fixture.status))
}

fn json_response(status: u16, body: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type("application/json; charset=utf-8"))
        .with_status_code(StatusCode(status))
}

fn content_type(value: &'static str) -> Header {
    Header::from_bytes("Content-Type", value).expect("static content type header is valid")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
