//! Session history records.
//!
//! One entry per completed, evaluated call. Histories are ordered
//! most-recent-first and capped at `HISTORY_CAPACITY` by the store.

use crate::evaluation::{EvaluationResult, Outcome};
use crate::scenario::Scenario;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept
pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub scenario_id: String,
    pub scenario_title: String,
    pub scenario_type: String,
    pub city: String,
    pub score: u8,
    pub outcome: Outcome,
    #[serde(default)]
    pub good: Vec<String>,
    #[serde(default)]
    pub bad: Vec<String>,
    #[serde(default, rename = "fatal_errors")]
    pub fatal_errors: Vec<String>,
    pub date: DateTime<Utc>,
}

impl HistoryEntry {
    /// Derive a history record from a scenario and its evaluation
    pub fn from_evaluation(scenario: &Scenario, result: &EvaluationResult, date: DateTime<Utc>) -> Self {
        Self {
            scenario_id: scenario.id.to_string(),
            scenario_title: scenario.title.to_string(),
            scenario_type: scenario.incident_type.to_string(),
            city: scenario.city.to_string(),
            score: result.score,
            outcome: result.outcome,
            good: result.good.clone(),
            bad: result.bad.clone(),
            fatal_errors: result.fatal_errors.clone(),
            date,
        }
    }
}

/// Prepend `entry` and drop anything beyond `capacity`
pub fn push_front_capped(history: &mut Vec<HistoryEntry>, entry: HistoryEntry, capacity: usize) {
    history.insert(0, entry);
    history.truncate(capacity);
}
