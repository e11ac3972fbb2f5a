/// Configuration system for aether.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — [`schema::AetherConfig::default()`], with the
///    endpoint URL fixed at build time
/// 2. **User global config** — `~/.aether/config.toml`
/// 3. **Project local config** — `.aether.toml` in the current working directory
/// 4. **Environment variables** — `AETHER_*` overrides (highest precedence)
///
/// # Usage
///
/// ```rust,ignore
/// use aether::config;
///
/// let cfg = config::load();
/// let endpoint = aether::client::HttpEndpoint::from_config(&cfg.endpoint);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::AetherConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars.
pub fn load() -> AetherConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Fold TOML files over the defaults, in order. Later files win key by key,
/// so a layer that sets one field leaves every other field alone.
///
/// Missing, unreadable or invalid layers are skipped; a broken config file
/// must never stop the client from reaching the engine.
pub fn load_layers(paths: &[Option<PathBuf>]) -> AetherConfig {
    let Ok(mut merged) = toml::Value::try_from(AetherConfig::default()) else {
        return AetherConfig::default();
    };

    for layer in paths.iter().filter_map(|path| read_toml_value(path.as_deref())) {
        let mut candidate = merged.clone();
        merge_toml(&mut candidate, layer);
        if candidate.clone().try_into::<AetherConfig>().is_ok() {
            merged = candidate;
        }
    }

    merged.try_into::<AetherConfig>().unwrap_or_default()
}

/// Load a single TOML config file on its own (if it exists).
pub fn load_toml_file(path: Option<PathBuf>) -> Option<AetherConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

fn read_toml_value(path: Option<&Path>) -> Option<toml::Value> {
    let content = fs::read_to_string(path?).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `layer` into `base`. Tables merge; anything else is
/// replaced.
fn merge_toml(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base), toml::Value::Table(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.aether`, home of the global config and the activity log.
pub fn aether_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aether"))
}

fn global_config_path() -> Option<PathBuf> {
    aether_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".aether.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `AETHER_ENDPOINT_URL` — analysis endpoint URL
/// - `AETHER_CURRENCY_SYMBOL` — close price prefix
/// - `AETHER_COLOR` — colour output (`1`/`true`/`yes`/`on`)
/// - `AETHER_ACTIVITY_LOG` — activity log on/off
/// - `NO_COLOR` — any non-empty value disables colour
pub fn apply_env_overrides(config: &mut AetherConfig) {
    if let Ok(val) = std::env::var("AETHER_ENDPOINT_URL")
        && !val.trim().is_empty()
    {
        config.endpoint.url = val.trim().to_string();
    }
    if let Ok(val) = std::env::var("AETHER_CURRENCY_SYMBOL") {
        config.display.currency_symbol = val;
    }
    if let Ok(val) = std::env::var("AETHER_COLOR") {
        config.display.color = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("NO_COLOR")
        && !val.is_empty()
    {
        config.display.color = false;
    }
    if let Ok(val) = std::env::var("AETHER_ACTIVITY_LOG") {
        config.logging.activity_log = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
pub fn is_truthy(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / show
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.aether/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

/// Write the default annotated config to an explicit path.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, AetherConfig::default_toml()).context("failed to write config file")
}

/// Set a single dotted key (e.g. `endpoint.url`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a single dotted key in the config file at `path`, creating the file
/// from defaults if it does not exist yet.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&AetherConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Refuse to write something the loader would silently discard.
    let rendered = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<AetherConfig>(&rendered)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, rendered).context("failed to write config file")
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config keys look like 'section.field', got '{key}'");
    };

    let mut current = root;
    for part in section.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("unsupported value type for '{key}'"),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
