//! Activity log — one JSON line per activation in `~/.aether/activity.jsonl`.
//!
//! Writing is best-effort: a full disk or missing home directory never turns
//! into a user-visible failure. `aether history` reads the file back.

pub mod activity;

pub use activity::{ActivityEntry, ActivitySummary};
