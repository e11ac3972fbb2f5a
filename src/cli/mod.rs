//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `aether analyze` — one request cycle, rendered as text, JSON or HTML
//! - `aether console` — interactive loop; Enter triggers an analysis
//! - `aether history` — recent activations from the activity log
//! - `aether mock` — local stand-in for the analysis engine
//! - `aether config show|init|set` — configuration management

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;

use crate::analytics::activity::{self, ActivityEntry, ActivitySummary};
use crate::client::{AnalysisEndpoint, HttpEndpoint};
use crate::config::{self, AetherConfig};
use crate::controller::{Activation, AnalysisController, UiSinks};
use crate::mock::{self, Scenario};
use crate::render::html::HtmlResults;
use crate::render::memory::{MemoryResults, MemorySpinner, MemoryStatus, MemoryTrigger};
use crate::render::terminal::{TerminalResults, TerminalSpinner, TerminalStatus, TerminalTrigger};

/// Output format for `aether analyze`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

/// Output format for `aether history`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum HistoryFormat {
    #[default]
    Table,
    Json,
}

/// Resolve config and apply colour settings.
fn load_config() -> AetherConfig {
    let config = config::load();
    if !config.display.color {
        colored::control::set_override(false);
    }
    config
}

fn endpoint_for(config: &AetherConfig, url: Option<&str>) -> HttpEndpoint {
    match url {
        Some(url) => HttpEndpoint::new(url),
        None => HttpEndpoint::from_config(&config.endpoint),
    }
}

fn record(config: &AetherConfig, endpoint: &impl AnalysisEndpoint, activation: &Activation) {
    if config.logging.activity_log {
        activity::log_activity(&endpoint.label(), activation);
    }
}

// ---------------------------------------------------------------------------
// aether analyze
// ---------------------------------------------------------------------------

/// Run one request cycle and print the result.
pub fn run_analyze(url: Option<&str>, format: OutputFormat) -> Result<()> {
    let config = load_config();
    let endpoint = endpoint_for(&config, url);

    match format {
        OutputFormat::Text => analyze_text(&config, endpoint),
        OutputFormat::Json => analyze_json(&config, endpoint),
        OutputFormat::Html => analyze_html(&config, endpoint),
    }
}

fn analyze_text(config: &AetherConfig, endpoint: HttpEndpoint) -> Result<()> {
    let mut trigger = TerminalTrigger::default();
    let mut status = TerminalStatus;
    let mut spinner = TerminalSpinner;
    let mut results = TerminalResults::default();

    println!("{} {}", "Endpoint:".dimmed(), endpoint.url().dimmed());

    let mut controller = AnalysisController::new(
        endpoint,
        UiSinks {
            trigger: &mut trigger,
            status: &mut status,
            spinner: &mut spinner,
            results: &mut results,
        },
        config.display.currency_symbol.as_str(),
    );
    let activation = controller.activate();
    record(config, controller.endpoint(), &activation);

    Ok(())
}

fn analyze_json(config: &AetherConfig, endpoint: HttpEndpoint) -> Result<()> {
    let mut trigger = MemoryTrigger::default();
    let mut status = MemoryStatus::default();
    let mut spinner = MemorySpinner::default();
    let mut results = MemoryResults::default();

    let label = endpoint.label();
    let activation = {
        let mut controller = AnalysisController::new(
            endpoint,
            UiSinks {
                trigger: &mut trigger,
                status: &mut status,
                spinner: &mut spinner,
                results: &mut results,
            },
            config.display.currency_symbol.as_str(),
        );
        controller.activate()
    };
    if config.logging.activity_log {
        activity::log_activity(&label, &activation);
    }

    let value = serde_json::json!({
        "endpoint": label,
        "phase": activation.phase,
        "status_text": activation.status_text,
        "latency_ms": activation.latency_ms,
        "outcome": activation.outcome,
        "cards": results.cards,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn analyze_html(config: &AetherConfig, endpoint: HttpEndpoint) -> Result<()> {
    let mut trigger = MemoryTrigger::default();
    let mut status = MemoryStatus::default();
    let mut spinner = MemorySpinner::default();
    let mut results = HtmlResults::default();

    let label = endpoint.label();
    let activation = {
        let mut controller = AnalysisController::new(
            endpoint,
            UiSinks {
                trigger: &mut trigger,
                status: &mut status,
                spinner: &mut spinner,
                results: &mut results,
            },
            config.display.currency_symbol.as_str(),
        );
        controller.activate()
    };
    if config.logging.activity_log {
        activity::log_activity(&label, &activation);
    }

    eprintln!("{}", activation.status_text);
    if !results.fragments().is_empty() {
        println!("{}", results.to_html());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// aether console
// ---------------------------------------------------------------------------

/// Interactive loop: each empty line (Enter) runs one cycle, `q` quits.
///
/// Input typed while a request is in flight is read only after the cycle
/// finishes, so cycles never overlap.
pub fn run_console(url: Option<&str>) -> Result<()> {
    let config = load_config();
    let endpoint = endpoint_for(&config, url);

    println!("{}", "Aether Analysis Console".bold().cyan());
    println!("{}", "=".repeat(50));
    println!("  {} {}", "Endpoint:".bold(), endpoint.url());
    println!();

    let mut trigger = TerminalTrigger::with_prompt("[Enter] analyze   [q] quit");
    let mut status = TerminalStatus;
    let mut spinner = TerminalSpinner;
    let mut results = TerminalResults::default();

    let mut controller = AnalysisController::new(
        endpoint,
        UiSinks {
            trigger: &mut trigger,
            status: &mut status,
            spinner: &mut spinner,
            results: &mut results,
        },
        config.display.currency_symbol.as_str(),
    );

    for line in io::stdin().lock().lines() {
        let line = line.context("failed reading from stdin")?;
        match line.trim() {
            "q" | "quit" | "exit" => break,
            "" | "a" | "analyze" => {
                let activation = controller.activate();
                record(&config, controller.endpoint(), &activation);
            }
            other => println!("{} {}", "Unknown input:".yellow(), other),
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// aether history
// ---------------------------------------------------------------------------

/// Show the most recent activations.
pub fn run_history(limit: usize, format: HistoryFormat) -> Result<()> {
    let entries = activity::read_recent(limit);
    let summary = activity::summarize(&entries);

    if format == HistoryFormat::Json {
        let value = serde_json::json!({
            "summary": summary,
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "{}",
            "No activity yet. Run `aether analyze` to contact the engine.".yellow()
        );
        return Ok(());
    }

    print_history_table(&entries, &summary);
    Ok(())
}

fn print_history_table(entries: &[ActivityEntry], summary: &ActivitySummary) {
    println!("{}", "Aether Activity".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    println!("  {} {}", "Activations:".bold(), summary.total);
    println!("  {} {:.0} ms", "Avg latency:".bold(), summary.avg_latency_ms);
    println!("  {} {:.1}%", "Failures:   ".bold(), summary.failure_pct());
    println!();

    println!(
        "  {:<20} {:<18} {:>6} {:>9}",
        "Time", "Outcome", "Cards", "Latency"
    );
    println!("  {}", "-".repeat(58));

    for (i, entry) in entries.iter().enumerate() {
        let time = chrono::DateTime::parse_from_rfc3339(&entry.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| entry.timestamp.clone());
        let line = format!(
            "  {:<20} {:<18} {:>6} {:>7}ms",
            time, entry.outcome, entry.cards, entry.latency_ms
        );
        let line = if entry.outcome == "request_failed" {
            line.red().to_string()
        } else if i % 2 == 1 {
            line.dimmed().to_string()
        } else {
            line
        };
        println!("{line}");
        if let Some(detail) = &entry.detail {
            println!("      {}", truncate(detail, 70).dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// aether mock
// ---------------------------------------------------------------------------

/// Serve canned engine responses until interrupted.
pub fn run_mock(addr: &str, scenario: Scenario) -> Result<()> {
    mock::serve(addr, scenario)
}

// ---------------------------------------------------------------------------
// aether config show | init | set
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Aether Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.aether/config.toml", global_exists);
    print_source(".aether.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "AETHER_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.aether/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::from_str("json", true), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("HTML", true), Ok(OutputFormat::Html));
        assert_eq!(OutputFormat::from_str("text", false), Ok(OutputFormat::Text));
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn misspelled_formats_are_rejected() {
        assert!(OutputFormat::from_str("jsn", true).is_err());
        assert!(OutputFormat::from_str("table", true).is_err());
        assert!(HistoryFormat::from_str("josn", true).is_err());
        assert_eq!(HistoryFormat::from_str("json", true), Ok(HistoryFormat::Json));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }
}
