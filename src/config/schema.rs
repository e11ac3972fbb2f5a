/// Configuration schema and defaults for aether.
///
/// Sections: `[endpoint]`, `[display]`, `[logging]`. Every field has a
/// built-in default; users only set what they want to override.
use serde::{Deserialize, Serialize};

/// Endpoint used when nothing else is configured.
///
/// Set `AETHER_DEFAULT_ENDPOINT` at compile time to bake a different URL into
/// the binary (e.g. for a hosted engine).
pub const DEFAULT_ENDPOINT_URL: &str = match option_env!("AETHER_DEFAULT_ENDPOINT") {
    Some(url) => url,
    None => "http://127.0.0.1:8000/analyze",
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level aether configuration.
///
/// Maps to `~/.aether/config.toml` and `.aether.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AetherConfig {
    pub endpoint: EndpointConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [endpoint]
// ---------------------------------------------------------------------------

/// Where the analysis engine lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Full URL of the analysis endpoint. Requested with a bare `GET`.
    pub url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix for the close price in the normal-status card.
    pub currency_symbol: String,
    /// Colour terminal output. `NO_COLOR` in the environment also disables it.
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            color: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append one JSON line per activation to `~/.aether/activity.jsonl`.
    pub activity_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { activity_log: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl AetherConfig {
    /// The commented default config written by `aether config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# aether configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (AETHER_*)
#   2. Project config (.aether.toml in current directory)
#   3. User global config (~/.aether/config.toml)
#   4. Built-in defaults

[endpoint]
url = "{DEFAULT_ENDPOINT_URL}"   # GET, no auth, no query parameters

[display]
currency_symbol = "$"
color = true

[logging]
activity_log = true   # ~/.aether/activity.jsonl
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
