/// Result of one activation, produced by the request side and consumed by
/// the renderer.
///
/// Classification is a pure function of the response body so that it can be
/// tested without a network.
use serde::Serialize;
use serde_json::Value;

use super::envelope::{LatestData, ResponseEnvelope};
use super::{ANOMALY_STATUS, NORMAL_STATUS};

/// Every way one request cycle can end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// The engine flagged an anomaly and produced a strategic analysis.
    AnomalyFound {
        raw_anomaly_details: Value,
        strategic_analysis: String,
    },
    /// Nothing unusual; the engine reports the latest data point.
    NormalStatus { latest_data: LatestData },
    /// The body parsed but its status is missing or not one we render.
    UnknownResponse { error: Option<String> },
    /// The request never produced a usable body.
    RequestFailed { failure: RequestFailure },
}

impl AnalysisOutcome {
    /// Classify a raw response body.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => Self::failed(RequestFailure::Malformed(format!("invalid JSON: {e}"))),
        }
    }

    /// Classify an already-parsed JSON document.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::UnknownResponse { error: None };
        }

        let envelope: ResponseEnvelope = match serde_json::from_value(value) {
            Ok(env) => env,
            Err(e) => return Self::failed(RequestFailure::Malformed(e.to_string())),
        };

        match envelope.status_str() {
            Some(ANOMALY_STATUS) => Self::anomaly(envelope),
            Some(NORMAL_STATUS) => Self::normal(envelope),
            _ => Self::UnknownResponse {
                error: envelope.error_str().map(str::to_string),
            },
        }
    }

    /// Shorthand for a [`RequestFailed`](Self::RequestFailed) outcome.
    pub fn failed(failure: RequestFailure) -> Self {
        Self::RequestFailed { failure }
    }

    fn anomaly(envelope: ResponseEnvelope) -> Self {
        let Some(raw_anomaly_details) = envelope.raw_anomaly_details else {
            return Self::failed(RequestFailure::Malformed(
                "anomaly response without raw_anomaly_details".to_string(),
            ));
        };
        let strategic_analysis = match envelope.strategic_analysis {
            Some(Value::String(text)) => text,
            Some(_) => {
                return Self::failed(RequestFailure::Malformed(
                    "strategic_analysis is not a string".to_string(),
                ));
            }
            None => {
                return Self::failed(RequestFailure::Malformed(
                    "anomaly response without strategic_analysis".to_string(),
                ));
            }
        };

        Self::AnomalyFound {
            raw_anomaly_details,
            strategic_analysis,
        }
    }

    fn normal(envelope: ResponseEnvelope) -> Self {
        let Some(raw) = envelope.latest_data else {
            return Self::failed(RequestFailure::Malformed(
                "normal response without latest_data".to_string(),
            ));
        };
        match serde_json::from_value::<LatestData>(raw) {
            Ok(latest_data) => Self::NormalStatus { latest_data },
            Err(e) => Self::failed(RequestFailure::Malformed(format!("latest_data: {e}"))),
        }
    }

    /// Short machine-readable name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AnomalyFound { .. } => "anomaly_found",
            Self::NormalStatus { .. } => "normal_status",
            Self::UnknownResponse { .. } => "unknown_response",
            Self::RequestFailed { .. } => "request_failed",
        }
    }

    /// Whether the cycle ended in the `Failed` phase.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }
}

/// Why a request produced no usable body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RequestFailure {
    /// The engine answered with a non-2xx status.
    Http { status: u16 },
    /// Connection, DNS or I/O failure before a status was received.
    Transport(String),
    /// Body was not JSON, or lacked the shape its status requires.
    Malformed(String),
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { status } => write!(f, "HTTP error: status {status}"),
            Self::Transport(detail) => write!(f, "transport error: {detail}"),
            Self::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

impl std::error::Error for RequestFailure {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
