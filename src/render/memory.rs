//! In-memory surfaces that record what the controller did to them.
//!
//! Used by tests, and by `aether analyze --format json|html` where nothing is
//! drawn until the cycle has finished.

use crate::controller::{Card, LoadingIndicator, ResultsContainer, StatusText, TriggerControl};

/// Records every enable/disable call.
#[derive(Debug, Clone)]
pub struct MemoryTrigger {
    pub enabled: bool,
    pub history: Vec<bool>,
}

impl Default for MemoryTrigger {
    fn default() -> Self {
        Self {
            enabled: true,
            history: Vec::new(),
        }
    }
}

impl TriggerControl for MemoryTrigger {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.history.push(enabled);
    }
}

/// Records every status line shown.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatus {
    pub text: String,
    pub history: Vec<String>,
}

impl StatusText for MemoryStatus {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.history.push(text.to_string());
    }
}

/// Records spinner visibility changes.
#[derive(Debug, Clone, Default)]
pub struct MemorySpinner {
    pub visible: bool,
    pub history: Vec<bool>,
}

impl LoadingIndicator for MemorySpinner {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.history.push(visible);
    }
}

/// Holds the current cards and counts clears.
#[derive(Debug, Clone, Default)]
pub struct MemoryResults {
    pub cards: Vec<Card>,
    pub clears: usize,
}

impl ResultsContainer for MemoryResults {
    fn clear(&mut self) {
        self.cards.clear();
        self.clears += 1;
    }

    fn append(&mut self, card: Card) {
        self.cards.push(card);
    }
}
