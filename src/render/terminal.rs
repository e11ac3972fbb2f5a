//! Coloured terminal surfaces for `aether analyze` and `aether console`.
//!
//! The terminal is append-only, so "clearing" results starts a fresh block
//! and "hiding" the spinner is a no-op; each surface prints as its state
//! changes.

use colored::Colorize;

use crate::analysis::{COMPLETE_MESSAGE, CONTACTING_MESSAGE, UNAVAILABLE_MESSAGE};
use crate::controller::{
    Card, CardBody, LoadingIndicator, ResultsContainer, StatusText, TriggerControl,
};

/// Prints a key hint whenever the trigger becomes available.
#[derive(Debug, Default)]
pub struct TerminalTrigger {
    prompt: Option<String>,
}

impl TerminalTrigger {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }
}

impl TriggerControl for TerminalTrigger {
    fn set_enabled(&mut self, enabled: bool) {
        if enabled && let Some(prompt) = &self.prompt {
            println!("{}", prompt.dimmed());
        }
    }
}

#[derive(Debug, Default)]
pub struct TerminalStatus;

impl StatusText for TerminalStatus {
    fn set_text(&mut self, text: &str) {
        println!("{}", colorize_status(text));
    }
}

#[derive(Debug, Default)]
pub struct TerminalSpinner;

impl LoadingIndicator for TerminalSpinner {
    fn set_visible(&mut self, visible: bool) {
        if visible {
            println!("  {}", "⏳ waiting for the engine...".dimmed());
        }
    }
}

/// Prints each card as it is appended.
#[derive(Debug, Default)]
pub struct TerminalResults {
    shown: usize,
}

impl TerminalResults {
    /// Cards printed since the last clear.
    pub fn shown(&self) -> usize {
        self.shown
    }
}

impl ResultsContainer for TerminalResults {
    fn clear(&mut self) {
        if self.shown > 0 {
            println!();
        }
        self.shown = 0;
    }

    fn append(&mut self, card: Card) {
        println!();
        println!("{}", format_card(&card));
        self.shown += 1;
    }
}

/// Render a card as a titled, indented block.
pub fn format_card(card: &Card) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", card.title.bold().cyan()));
    out.push_str(&format!("{}\n", "=".repeat(card.title.chars().count().max(20))));

    match &card.body {
        CardBody::Preformatted(text) => {
            for line in text.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
        CardBody::Fields(fields) => {
            let width = fields
                .iter()
                .map(|f| f.label.chars().count() + 1)
                .max()
                .unwrap_or(0);
            for f in fields {
                let label = format!("{}:", f.label);
                out.push_str(&format!("  {} {}\n", format!("{label:<width$}").bold(), f.value));
            }
        }
    }

    out.trim_end().to_string()
}

fn colorize_status(text: &str) -> colored::ColoredString {
    match text {
        UNAVAILABLE_MESSAGE => text.red().bold(),
        COMPLETE_MESSAGE => text.green().bold(),
        CONTACTING_MESSAGE => text.cyan(),
        _ => text.yellow(),
    }
}
