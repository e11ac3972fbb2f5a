/// Response body model for the remote analysis engine.
///
/// The engine answers `GET /analyze` with a single JSON object. Fields are
/// kept loose (`serde_json::Value`) at this layer so that a field used by one
/// branch never makes another branch fail to decode. Typed decoding happens
/// in [`super::outcome`] once the branch is known.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The JSON envelope returned by the engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponseEnvelope {
    /// Branch selector. Compared by exact string match.
    pub status: Option<Value>,
    /// Opaque anomaly payload (anomaly case). `null` is a payload; only an
    /// absent key is `None`.
    #[serde(deserialize_with = "present")]
    pub raw_anomaly_details: Option<Value>,
    /// Narrative analysis text (anomaly case).
    pub strategic_analysis: Option<Value>,
    /// Latest market data point (normal case).
    pub latest_data: Option<Value>,
    /// Server-provided error text (fallback case).
    pub error: Option<Value>,
}

impl ResponseEnvelope {
    /// The status field, if present and a string.
    pub fn status_str(&self) -> Option<&str> {
        self.status.as_ref().and_then(Value::as_str)
    }

    /// The error field, if present and a string.
    pub fn error_str(&self) -> Option<&str> {
        self.error.as_ref().and_then(Value::as_str)
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`. Absent keys fall back to
/// the container's `#[serde(default)]`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Latest data point shown in the normal-status view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestData {
    pub symbol: String,
    pub close_price: ClosePrice,
    pub timestamp: String,
}

/// Close price as sent by the engine: upstream feeds deliver it as a string
/// (`"949.5000"`), hand-built responses often as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClosePrice {
    Number(f64),
    Text(String),
}

impl ClosePrice {
    /// Numeric value, or `None` if the text form does not parse.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// The price exactly as received.
    pub fn raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_ignores_unknown_fields() {
        let env: ResponseEnvelope =
            serde_json::from_str(r#"{"status":"x","extra":[1,2]}"#).unwrap();
        assert_eq!(env.status_str(), Some("x"));
        assert!(env.error.is_none());
    }

    #[test]
    fn null_anomaly_details_are_present() {
        let env: ResponseEnvelope =
            serde_json::from_str(r#"{"raw_anomaly_details":null}"#).unwrap();
        assert_eq!(env.raw_anomaly_details, Some(Value::Null));

        let env: ResponseEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(env.raw_anomaly_details, None);
    }

    #[test]
    fn non_string_status_is_not_a_status() {
        let env: ResponseEnvelope = serde_json::from_str(r#"{"status":42}"#).unwrap();
        assert_eq!(env.status_str(), None);
    }

    #[test]
    fn close_price_accepts_string_and_number() {
        let text: ClosePrice = serde_json::from_str(r#""949.5000""#).unwrap();
        let num: ClosePrice = serde_json::from_str("101.5").unwrap();
        assert_eq!(text.value(), Some(949.5));
        assert_eq!(num.value(), Some(101.5));
        assert_eq!(text.raw(), "949.5000");
    }

    #[test]
    fn close_price_rejects_garbage_text() {
        let price = ClosePrice::Text("n/a".to_string());
        assert_eq!(price.value(), None);
        assert_eq!(price.raw(), "n/a");
    }
}
