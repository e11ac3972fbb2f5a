//! Response model and outcome classification for the Aether analysis engine.
//!
//! The engine's `/analyze` endpoint returns one JSON object whose `status`
//! field selects how it is rendered:
//!
//! - [`ANOMALY_STATUS`] → anomaly view (raw details + strategic analysis)
//! - [`NORMAL_STATUS`] → normal-status view (latest data point)
//! - anything else → the server's `error` text, or a generic message
//!
//! Both status strings are matched exactly. They are owned by the server; if
//! its wording changes, responses fall through to
//! [`AnalysisOutcome::UnknownResponse`] rather than being guessed at.

pub mod envelope;
pub mod outcome;

pub use envelope::{ClosePrice, LatestData, ResponseEnvelope};
pub use outcome::{AnalysisOutcome, RequestFailure};

/// Status value the engine sends when it detected an anomaly.
pub const ANOMALY_STATUS: &str = "Anomaly Detected";

/// Status value the engine sends when nothing unusual was found.
pub const NORMAL_STATUS: &str = "No significant anomaly detected.";

/// Status text while a request is in flight.
pub const CONTACTING_MESSAGE: &str = "Contacting Aether engine...";

/// Status text after an anomaly or normal-status view was rendered.
pub const COMPLETE_MESSAGE: &str = "Analysis complete.";

/// Status text for an unrecognised status without an `error` field.
pub const UNKNOWN_RESPONSE_MESSAGE: &str = "Unknown response from the Aether engine.";

/// Status text for every request failure (HTTP, transport, malformed body).
pub const UNAVAILABLE_MESSAGE: &str =
    "Error: the Aether engine is waking up or unavailable. Please try again shortly.";

/// Status text to show once `outcome` has been rendered.
pub fn status_text(outcome: &AnalysisOutcome) -> &str {
    match outcome {
        AnalysisOutcome::AnomalyFound { .. } | AnalysisOutcome::NormalStatus { .. } => {
            COMPLETE_MESSAGE
        }
        AnalysisOutcome::UnknownResponse { error } => {
            error.as_deref().unwrap_or(UNKNOWN_RESPONSE_MESSAGE)
        }
        AnalysisOutcome::RequestFailed { .. } => UNAVAILABLE_MESSAGE,
    }
}
