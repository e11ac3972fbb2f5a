use anyhow::Result;
use clap::{Parser, Subcommand};

use aether::cli::{self, HistoryFormat, OutputFormat};
use aether::mock::Scenario;

#[derive(Debug, Parser)]
#[command(name = "aether")]
#[command(about = "Client for the Aether market anomaly engine")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Request one analysis from the engine and print the result
    Analyze {
        /// Endpoint URL (overrides config)
        #[arg(long)]
        url: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Interactive console — press Enter to request an analysis
    Console {
        /// Endpoint URL (overrides config)
        #[arg(long)]
        url: Option<String>,
    },
    /// Show recent activations from the activity log
    History {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format
        #[arg(long, value_enum, default_value_t = HistoryFormat::Table)]
        format: HistoryFormat,
    },
    /// Run a local mock engine with canned responses
    Mock {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: String,
        /// Response to serve
        #[arg(long, value_enum, default_value_t = Scenario::Anomaly)]
        scenario: Scenario,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration and its sources
    Show,
    /// Write a default config to ~/.aether/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `aether config set endpoint.url http://host:8000/analyze`
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Analyze { url, format } => cli::run_analyze(url.as_deref(), format),
        Commands::Console { url } => cli::run_console(url.as_deref()),
        Commands::History { limit, format } => cli::run_history(limit, format),
        Commands::Mock { addr, scenario } => cli::run_mock(&addr, scenario),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
        },
    }
}
