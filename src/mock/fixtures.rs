//! Canned engine responses.
//!
//! Figures follow the engine's intraday feed for IBM (5-minute bars, close
//! prices as 4-decimal strings).

use serde_json::{Value, json};

use crate::analysis::{ANOMALY_STATUS, NORMAL_STATUS};

/// Which response the mock engine returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Anomaly with raw details and a strategic analysis.
    #[default]
    Anomaly,
    /// Normal status with the latest bar.
    Normal,
    /// A status string the client does not know.
    Unknown,
    /// Body with only an `error` field.
    Error,
    /// `503 Service Unavailable` with a JSON error body.
    HttpError,
    /// `200 OK` whose body is not JSON.
    Malformed,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anomaly => write!(f, "anomaly"),
            Self::Normal => write!(f, "normal"),
            Self::Unknown => write!(f, "unknown"),
            Self::Error => write!(f, "error"),
            Self::HttpError => write!(f, "http-error"),
            Self::Malformed => write!(f, "malformed"),
        }
    }
}

/// A canned HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Scenario {
    pub fn fixture(self) -> Fixture {
        match self {
            Self::Anomaly => json_fixture(200, anomaly_body()),
            Self::Normal => json_fixture(200, normal_body()),
            Self::Unknown => json_fixture(
                200,
                json!({ "status": "No significant anomaly detected by the local engine." }),
            ),
            Self::Error => json_fixture(200, json!({ "error": "Could not fetch market data." })),
            Self::HttpError => json_fixture(
                503,
                json!({ "error": "An internal server error occurred. Please check the logs." }),
            ),
            Self::Malformed => Fixture {
                status: 200,
                content_type: "text/html; charset=utf-8",
                body: "<html><body>Service starting...</body></html>".to_string(),
            },
        }
    }
}

fn json_fixture(status: u16, body: Value) -> Fixture {
    Fixture {
        status,
        content_type: "application/json; charset=utf-8",
        body: body.to_string(),
    }
}

pub fn anomaly_body() -> Value {
    json!({
        "status": ANOMALY_STATUS,
        "raw_anomaly_details": {
            "type": "price_spike",
            "previous_close": 950.0,
            "latest_close": 949.5,
            "change_pct": -0.05,
            "volume": 15000,
            "symbol": "IBM",
            "timestamp": "2025-10-04 20:00:00"
        },
        "strategic_analysis": "Volume is below the session average and the move is within one standard deviation. Hold; re-evaluate at the next bar."
    })
}

pub fn normal_body() -> Value {
    json!({
        "status": NORMAL_STATUS,
        "latest_data": {
            "symbol": "IBM",
            "close_price": "949.5000",
            "timestamp": "2025-10-04 20:00:00"
        }
    })
}
