/// HTTP access to the Aether analysis engine.
///
/// Uses the synchronous `ureq` client. One activation issues exactly one
/// `GET` with no body, no query string and no custom headers. There is no
/// explicit timeout and no retry: the transport's defaults bound the wait,
/// and a failure is reported once for the user to retry manually.
use std::time::Instant;

use crate::analysis::{AnalysisOutcome, RequestFailure};
use crate::config::schema::EndpointConfig;

// ---------------------------------------------------------------------------
// Endpoint abstraction
// ---------------------------------------------------------------------------

/// Something that can fetch the raw analysis body.
///
/// Implemented by [`HttpEndpoint`] for real use and by closures for tests.
pub trait AnalysisEndpoint {
    /// Fetch the response body. Non-2xx statuses and transport problems are
    /// returned as [`RequestFailure`], never as a body.
    fn fetch(&self) -> Result<String, RequestFailure>;

    /// Human-readable location, used in logs.
    fn label(&self) -> String {
        "<custom endpoint>".to_string()
    }
}

impl<F> AnalysisEndpoint for F
where
    F: Fn() -> Result<String, RequestFailure>,
{
    fn fetch(&self) -> Result<String, RequestFailure> {
        self()
    }
}

/// Fetch and classify in one step.
pub fn request_analysis(endpoint: &(impl AnalysisEndpoint + ?Sized)) -> AnalysisOutcome {
    match endpoint.fetch() {
        Ok(body) => AnalysisOutcome::from_body(&body),
        Err(failure) => AnalysisOutcome::failed(failure),
    }
}

/// Like [`request_analysis`], also returning the wall-clock latency.
pub fn timed_request(endpoint: &(impl AnalysisEndpoint + ?Sized)) -> (AnalysisOutcome, u64) {
    let start = Instant::now();
    let outcome = request_analysis(endpoint);
    (outcome, start.elapsed().as_millis() as u64)
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Plain unauthenticated `GET` against a fixed URL.
#[derive(Debug)]
pub struct HttpEndpoint {
    url: String,
    agent: ureq::Agent,
}

impl HttpEndpoint {
    /// Build an endpoint for the given URL.
    ///
    /// `localhost` is rewritten to `127.0.0.1`: on Windows the name may
    /// resolve to `::1` first, and a development engine usually binds IPv4
    /// only.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim().replace("://localhost", "://127.0.0.1"),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Build an endpoint from the resolved config.
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(&config.url)
    }

    /// The URL this endpoint requests.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AnalysisEndpoint for HttpEndpoint {
    fn fetch(&self) -> Result<String, RequestFailure> {
        match self.agent.get(&self.url).call() {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| RequestFailure::Transport(format!("failed reading body: {e}"))),
            Err(ureq::Error::Status(status, _)) => Err(RequestFailure::Http { status }),
            Err(ureq::Error::Transport(transport)) => {
                Err(RequestFailure::Transport(transport.to_string()))
            }
        }
    }

    fn label(&self) -> String {
        self.url.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_is_pinned_to_ipv4() {
        let endpoint = HttpEndpoint::new("http://localhost:8000/analyze");
        assert_eq!(endpoint.url(), "http://127.0.0.1:8000/analyze");
        assert_eq!(endpoint.label(), "http://127.0.0.1:8000/analyze");
    }

    #[test]
    fn from_default_config() {
        let endpoint = HttpEndpoint::from_config(&EndpointConfig::default());
        assert!(endpoint.url().ends_with("/analyze"));
    }

    #[test]
    fn closure_failure_becomes_failed_outcome() {
        let endpoint =
            || -> Result<String, RequestFailure> { Err(RequestFailure::Http { status: 502 }) };
        let outcome = request_analysis(&endpoint);
        assert_eq!(
            outcome,
            AnalysisOutcome::failed(RequestFailure::Http { status: 502 })
        );
    }

    #[test]
    fn closure_body_is_classified() {
        let endpoint = || -> Result<String, RequestFailure> {
            Ok(r#"{"error":"Could not fetch market data."}"#.to_string())
        };
        let (outcome, _latency) = timed_request(&endpoint);
        assert_eq!(outcome.kind(), "unknown_response");
    }

    #[test]
    fn unreachable_host_is_transport_failure() {
        // Port 9 (discard) on loopback is closed in any sane test environment.
        let endpoint = HttpEndpoint::new("http://127.0.0.1:9/analyze");
        let outcome = request_analysis(&endpoint);
        assert!(matches!(
            outcome,
            AnalysisOutcome::RequestFailed {
                failure: RequestFailure::Transport(_)
            }
        ));
    }
}
