use std::collections::BTreeMap;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOutcome;
use crate::controller::Activation;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A single activation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub endpoint: String,
    /// Outcome kind: `anomaly_found`, `normal_status`, `unknown_response`,
    /// `request_failed`.
    pub outcome: String,
    pub status_text: String,
    #[serde(default)]
    pub cards: usize,
    pub latency_ms: u64,
    /// Failure description, or the server's error text for unknown responses.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

impl ActivityEntry {
    /// Build an entry stamped with the current time.
    pub fn from_activation(endpoint: &str, activation: &Activation) -> Self {
        let detail = match &activation.outcome {
            AnalysisOutcome::RequestFailed { failure } => Some(failure.to_string()),
            AnalysisOutcome::UnknownResponse { error } => error.clone(),
            _ => None,
        };
        Self {
            timestamp: Utc::now().to_rfc3339(),
            endpoint: endpoint.to_string(),
            outcome: activation.outcome.kind().to_string(),
            status_text: activation.status_text.clone(),
            cards: activation.cards,
            latency_ms: activation.latency_ms,
            detail,
        }
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Log an activation to `~/.aether/activity.jsonl`. Failures are ignored.
pub fn log_activity(endpoint: &str, activation: &Activation) {
    let Some(path) = activity_log_path() else {
        return;
    };
    let _ = append_entry(&path, &ActivityEntry::from_activation(endpoint, activation));
}

pub fn append_entry(path: &Path, entry: &ActivityEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read the last `limit` entries from the default log, oldest first.
pub fn read_recent(limit: usize) -> Vec<ActivityEntry> {
    match activity_log_path() {
        Some(path) => read_recent_from(&path, limit),
        None => Vec::new(),
    }
}

/// Read the last `limit` entries from `path`, oldest first. Malformed lines
/// are skipped; a missing file yields an empty list.
pub fn read_recent_from(path: &Path, limit: usize) -> Vec<ActivityEntry> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let entries: Vec<ActivityEntry> = BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect();

    let skip = entries.len().saturating_sub(limit);
    entries.into_iter().skip(skip).collect()
}

/// Return the path to the activity log file.
pub fn activity_log_path() -> Option<PathBuf> {
    crate::config::aether_dir().map(|dir| dir.join("activity.jsonl"))
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate view over a set of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub total: usize,
    /// Count per outcome kind.
    pub by_outcome: BTreeMap<String, usize>,
    pub avg_latency_ms: f64,
}

impl ActivitySummary {
    /// Fraction of activations that ended in a request failure, 0–100.
    pub fn failure_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let failed = self.by_outcome.get("request_failed").copied().unwrap_or(0);
        failed as f64 / self.total as f64 * 100.0
    }
}

pub fn summarize(entries: &[ActivityEntry]) -> ActivitySummary {
    if entries.is_empty() {
        return ActivitySummary::default();
    }

    let mut by_outcome = BTreeMap::new();
    for entry in entries {
        *by_outcome.entry(entry.outcome.clone()).or_insert(0) += 1;
    }
    let total_latency: u64 = entries.iter().map(|e| e.latency_ms).sum();

    ActivitySummary {
        total: entries.len(),
        by_outcome,
        avg_latency_ms: total_latency as f64 / entries.len() as f64,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RequestFailure;
    use crate::controller::UiPhase;

    fn entry(outcome: &str, latency_ms: u64) -> ActivityEntry {
        ActivityEntry {
            timestamp: "2025-10-04T20:00:00+00:00".to_string(),
            endpoint: "http://127.0.0.1:8000/analyze".to_string(),
            outcome: outcome.to_string(),
            status_text: "x".to_string(),
            cards: 0,
            latency_ms,
            detail: None,
        }
    }

    fn temp_log(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "aether-activity-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join("activity.jsonl")
    }

    #[test]
    fn failed_activation_records_detail() {
        let activation = Activation {
            outcome: AnalysisOutcome::failed(RequestFailure::Http { status: 503 }),
            phase: UiPhase::Failed,
            status_text: crate::analysis::UNAVAILABLE_MESSAGE.to_string(),
            cards: 0,
            latency_ms: 12,
        };
        let entry = ActivityEntry::from_activation("http://x/analyze", &activation);
        assert_eq!(entry.outcome, "request_failed");
        assert_eq!(entry.detail.as_deref(), Some("HTTP error: status 503"));
        assert_eq!(entry.latency_ms, 12);
    }

    #[test]
    fn append_then_read_skips_garbage() {
        let path = temp_log("roundtrip");
        append_entry(&path, &entry("anomaly_found", 10)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "not json").unwrap();
        }
        append_entry(&path, &entry("normal_status", 20)).unwrap();

        let entries = read_recent_from(&path, 10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].outcome, "anomaly_found");
        assert_eq!(entries[1].outcome, "normal_status");

        let last = read_recent_from(&path, 1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].outcome, "normal_status");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_log_reads_empty() {
        assert!(read_recent_from(Path::new("/nonexistent/aether/activity.jsonl"), 5).is_empty());
    }

    #[test]
    fn summary_counts_and_averages() {
        let entries = vec![
            entry("anomaly_found", 100),
            entry("request_failed", 300),
            entry("request_failed", 200),
            entry("normal_status", 0),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_outcome["request_failed"], 2);
        assert_eq!(summary.by_outcome["anomaly_found"], 1);
        assert!((summary.avg_latency_ms - 150.0).abs() < f64::EPSILON);
        assert!((summary.failure_pct() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.failure_pct(), 0.0);
    }
}
