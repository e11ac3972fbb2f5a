//! Turning outcomes into cards, and the card surfaces that display them.
//!
//! - [`cards_for`] — the single outcome → cards mapping
//! - [`terminal`] — coloured terminal surfaces for the interactive console
//! - [`html`] — HTML fragment container (`<div class="result-card">`)
//! - [`memory`] — recording surfaces for tests and machine-readable output

pub mod html;
pub mod memory;
pub mod terminal;

use serde_json::Value;

use crate::analysis::{AnalysisOutcome, ClosePrice, LatestData};
use crate::controller::Card;

pub const RAW_ANOMALY_TITLE: &str = "Raw Anomaly Detected";
pub const STRATEGIC_ANALYSIS_TITLE: &str = "Strategic Analysis";
pub const NORMAL_STATUS_TITLE: &str = "Market Status: Normal";

pub const SYMBOL_LABEL: &str = "Symbol";
pub const CLOSE_LABEL: &str = "Last Close";
pub const TIMESTAMP_LABEL: &str = "Timestamp";

/// Cards to append for an outcome. Empty for unknown and failed outcomes.
pub fn cards_for(outcome: &AnalysisOutcome, currency_symbol: &str) -> Vec<Card> {
    match outcome {
        AnalysisOutcome::AnomalyFound {
            raw_anomaly_details,
            strategic_analysis,
        } => Vec::from(anomaly_cards(raw_anomaly_details, strategic_analysis)),
        AnalysisOutcome::NormalStatus { latest_data } => {
            vec![normal_status_card(latest_data, currency_symbol)]
        }
        AnalysisOutcome::UnknownResponse { .. } | AnalysisOutcome::RequestFailed { .. } => {
            Vec::new()
        }
    }
}

/// Raw details first, strategic analysis second.
pub fn anomaly_cards(raw_anomaly_details: &Value, strategic_analysis: &str) -> [Card; 2] {
    [
        Card::preformatted(RAW_ANOMALY_TITLE, pretty_json(raw_anomaly_details)),
        Card::preformatted(STRATEGIC_ANALYSIS_TITLE, strategic_analysis),
    ]
}

pub fn normal_status_card(latest_data: &LatestData, currency_symbol: &str) -> Card {
    Card::fields(
        NORMAL_STATUS_TITLE,
        [
            (SYMBOL_LABEL, latest_data.symbol.clone()),
            (
                CLOSE_LABEL,
                format_close_price(&latest_data.close_price, currency_symbol),
            ),
            (TIMESTAMP_LABEL, latest_data.timestamp.clone()),
        ],
    )
}

/// Currency symbol plus exactly two decimals. A price that does not parse
/// as a number is shown as received, without the symbol.
pub fn format_close_price(price: &ClosePrice, currency_symbol: &str) -> String {
    match price.value() {
        Some(value) => format!("{currency_symbol}{value:.2}"),
        None => price.raw(),
    }
}

/// Two-space indented JSON, keys in the order the server sent them.
/// Integral floats print as integers (`950.0` and `1e2` become `950` and
/// `100`), the way a browser's `JSON.stringify` shows them.
pub fn pretty_json(value: &Value) -> String {
    let value = integral_floats_as_integers(value.clone());
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// Largest magnitude below which every integer is exactly representable.
const MAX_SAFE_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn integral_floats_as_integers(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < MAX_SAFE_FLOAT_INTEGER => {
                Value::from(f as i64)
            }
            _ => Value::Number(n),
        },
        Value::Array(items) => {
            Value::Array(items.into_iter().map(integral_floats_as_integers).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (key, integral_floats_as_integers(v)))
                .collect(),
        ),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RequestFailure;
    use crate::controller::CardBody;

    fn latest(price: ClosePrice) -> LatestData {
        LatestData {
            symbol: "IBM".to_string(),
            close_price: price,
            timestamp: "2025-10-04 20:00:00".to_string(),
        }
    }

    #[test]
    fn close_price_has_two_decimals() {
        assert_eq!(format_close_price(&ClosePrice::Number(101.5), "$"), "$101.50");
        assert_eq!(
            format_close_price(&ClosePrice::Text("42".to_string()), "$"),
            "$42.00"
        );
        assert_eq!(
            format_close_price(&ClosePrice::Text("949.5000".to_string()), "€"),
            "€949.50"
        );
        assert_eq!(format_close_price(&ClosePrice::Number(0.004), "$"), "$0.00");
    }

    #[test]
    fn unparseable_close_price_passes_through() {
        assert_eq!(
            format_close_price(&ClosePrice::Text("pending".to_string()), "$"),
            "pending"
        );
    }

    #[test]
    fn pretty_json_uses_two_spaces_and_keeps_order() {
        let value: Value = serde_json::from_str(r#"{"z":1,"a":{"b":[1,2]}}"#).unwrap();
        assert_eq!(
            pretty_json(&value),
            "{\n  \"z\": 1,\n  \"a\": {\n    \"b\": [\n      1,\n      2\n    ]\n  }\n}"
        );
    }

    #[test]
    fn pretty_json_prints_integral_floats_as_integers() {
        let value: Value =
            serde_json::from_str(r#"{"close":950.0,"volume":1e2,"ratio":0.25,"big":-3E0}"#)
                .unwrap();
        assert_eq!(
            pretty_json(&value),
            "{\n  \"close\": 950,\n  \"volume\": 100,\n  \"ratio\": 0.25,\n  \"big\": -3\n}"
        );
        assert_eq!(pretty_json(&serde_json::json!([1.5, [2.0]])), "[\n  1.5,\n  [\n    2\n  ]\n]");
    }

    #[test]
    fn anomaly_cards_are_ordered() {
        let [raw, analysis] = anomaly_cards(&serde_json::json!({"z": 1}), "Hold.");
        assert_eq!(raw.title, RAW_ANOMALY_TITLE);
        assert_eq!(raw.body, CardBody::Preformatted("{\n  \"z\": 1\n}".to_string()));
        assert_eq!(analysis.title, STRATEGIC_ANALYSIS_TITLE);
        assert_eq!(analysis.text(), "Hold.");
    }

    #[test]
    fn normal_card_fields() {
        let card = normal_status_card(&latest(ClosePrice::Text("949.5000".to_string())), "$");
        assert_eq!(card.title, NORMAL_STATUS_TITLE);
        assert_eq!(card.field(SYMBOL_LABEL), Some("IBM"));
        assert_eq!(card.field(CLOSE_LABEL), Some("$949.50"));
        assert_eq!(card.field(TIMESTAMP_LABEL), Some("2025-10-04 20:00:00"));
    }

    #[test]
    fn no_cards_for_unknown_or_failed() {
        assert!(cards_for(&AnalysisOutcome::UnknownResponse { error: None }, "$").is_empty());
        assert!(
            cards_for(
                &AnalysisOutcome::failed(RequestFailure::Http { status: 404 }),
                "$"
            )
            .is_empty()
        );
    }
}
