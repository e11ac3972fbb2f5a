//! Analysis Request Controller.
//!
//! Drives one request cycle against an [`AnalysisEndpoint`] and reflects it on
//! four injected UI surfaces:
//!
//! 1. Reset: clear results, show the spinner, disable the trigger, set the
//!    "contacting" status.
//! 2. Request: one `GET`, classified into an [`AnalysisOutcome`].
//! 3. Render: hide the spinner, set the final status, append cards.
//! 4. Release: the trigger is re-enabled by [`TriggerGuard`] and the spinner
//!    hidden by [`LoadingGuard`] on every exit path, including unwinding.
//!
//! The controller never runs two cycles at once: `activate` takes `&mut self`
//! and blocks until the cycle finishes.

pub mod sinks;

use serde::Serialize;

use crate::analysis::{self, AnalysisOutcome, CONTACTING_MESSAGE};
use crate::client::{AnalysisEndpoint, timed_request};
use crate::render;

pub use sinks::{
    Card, CardBody, CardField, LoadingIndicator, ResultsContainer, StatusText, TriggerControl,
    UiSinks,
};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the controller is in its request cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UiPhase {
    #[default]
    Idle,
    Loading,
    /// A response was rendered (anomaly, normal, or unknown status).
    Complete,
    /// The request failed; only the unavailability message is shown.
    Failed,
}

impl std::fmt::Display for UiPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trigger guard
// ---------------------------------------------------------------------------

/// Disables a trigger for the guard's lifetime and re-enables it on drop.
pub struct TriggerGuard<'g, T: TriggerControl + ?Sized> {
    trigger: &'g mut T,
}

impl<'g, T: TriggerControl + ?Sized> TriggerGuard<'g, T> {
    pub fn engage(trigger: &'g mut T) -> Self {
        trigger.set_enabled(false);
        Self { trigger }
    }
}

impl<T: TriggerControl + ?Sized> Drop for TriggerGuard<'_, T> {
    fn drop(&mut self) {
        self.trigger.set_enabled(true);
    }
}

/// Shows a loading indicator until [`hide`](Self::hide) is called or the
/// guard is dropped, whichever comes first.
pub struct LoadingGuard<'g, T: LoadingIndicator + ?Sized> {
    spinner: Option<&'g mut T>,
}

impl<'g, T: LoadingIndicator + ?Sized> LoadingGuard<'g, T> {
    pub fn engage(spinner: &'g mut T) -> Self {
        spinner.set_visible(true);
        Self {
            spinner: Some(spinner),
        }
    }

    pub fn hide(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.set_visible(false);
        }
    }
}

impl<T: LoadingIndicator + ?Sized> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        self.hide();
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Summary of one finished cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    pub outcome: AnalysisOutcome,
    pub phase: UiPhase,
    pub status_text: String,
    pub cards: usize,
    pub latency_ms: u64,
}

/// Binds an endpoint to a set of UI surfaces.
pub struct AnalysisController<'a, E: AnalysisEndpoint> {
    endpoint: E,
    sinks: UiSinks<'a>,
    currency_symbol: String,
    phase: UiPhase,
}

impl<'a, E: AnalysisEndpoint> AnalysisController<'a, E> {
    /// Create a controller. The trigger is enabled and the spinner hidden so
    /// the surfaces start in a known `Idle` state.
    pub fn new(endpoint: E, sinks: UiSinks<'a>, currency_symbol: impl Into<String>) -> Self {
        let mut controller = Self {
            endpoint,
            sinks,
            currency_symbol: currency_symbol.into(),
            phase: UiPhase::Idle,
        };
        controller.sinks.spinner.set_visible(false);
        controller.sinks.trigger.set_enabled(true);
        controller
    }

    pub fn phase(&self) -> UiPhase {
        self.phase
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Run one full request cycle.
    pub fn activate(&mut self) -> Activation {
        let UiSinks {
            trigger,
            status,
            spinner,
            results,
        } = &mut self.sinks;

        let _busy = TriggerGuard::engage(&mut **trigger);
        self.phase = UiPhase::Loading;
        results.clear();
        let mut loading = LoadingGuard::engage(&mut **spinner);
        status.set_text(CONTACTING_MESSAGE);

        let (outcome, latency_ms) = timed_request(&self.endpoint);

        loading.hide();
        let cards = render_outcome(&outcome, &mut **status, &mut **results, &self.currency_symbol);

        self.phase = if outcome.is_failure() {
            UiPhase::Failed
        } else {
            UiPhase::Complete
        };

        Activation {
            status_text: analysis::status_text(&outcome).to_string(),
            phase: self.phase,
            outcome,
            cards,
            latency_ms,
        }
    }
}

/// Apply a finished outcome to the status line and results container.
///
/// Returns the number of cards appended.
pub fn render_outcome(
    outcome: &AnalysisOutcome,
    status: &mut (impl StatusText + ?Sized),
    results: &mut (impl ResultsContainer + ?Sized),
    currency_symbol: &str,
) -> usize {
    status.set_text(analysis::status_text(outcome));
    let cards = render::cards_for(outcome, currency_symbol);
    let count = cards.len();
    for card in cards {
        results.append(card);
    }
    count
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
