//! Readiness aggregation over session history.
//!
//! Pure function, recomputed from scratch on every call. History is
//! most-recent-first, so the first entry seen for a scenario is its latest
//! attempt.

use crate::evaluation::Outcome;
use crate::history::HistoryEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How many strengths/weaknesses to report
pub const TOP_LABELS: usize = 4;

/// How many distinct fatal mistakes to report
pub const MAX_FATAL_MISTAKES: usize = 3;

pub const NO_HISTORY_RECOMMENDATION: &str =
    "No simulations completed yet. Select an incident from the map to begin training.";

/// Skill bucket derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Rookie,
    Trainee,
    Competent,
    Proficient,
    Expert,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Tier::Expert,
            75..=89 => Tier::Proficient,
            55..=74 => Tier::Competent,
            35..=54 => Tier::Trainee,
            _ => Tier::Rookie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Rookie => "ROOKIE",
            Tier::Trainee => "TRAINEE",
            Tier::Competent => "COMPETENT",
            Tier::Proficient => "PROFICIENT",
            Tier::Expert => "EXPERT",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best performance on one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioBreakdown {
    pub id: String,
    pub title: String,
    pub city: String,
    #[serde(rename = "type")]
    pub scenario_type: String,
    pub best_score: u8,
    pub attempts: u32,
    pub last_outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub overall_score: u8,
    pub tier: Tier,
    pub total_attempts: u32,
    pub survived_count: u32,
    /// Percentage, 0-100
    pub survival_rate: u8,
    pub scenario_breakdown: Vec<ScenarioBreakdown>,
    pub top_strengths: Vec<String>,
    pub top_weaknesses: Vec<String>,
    pub fatal_mistakes: Vec<String>,
    pub recommendation: String,
}

impl ReadinessReport {
    /// Report for an operator with no completed sessions
    pub fn empty() -> Self {
        Self {
            overall_score: 0,
            tier: Tier::Rookie,
            total_attempts: 0,
            survived_count: 0,
            survival_rate: 0,
            scenario_breakdown: Vec::new(),
            top_strengths: Vec::new(),
            top_weaknesses: Vec::new(),
            fatal_mistakes: Vec::new(),
            recommendation: NO_HISTORY_RECOMMENDATION.to_string(),
        }
    }
}

/// Aggregate a most-recent-first history into a readiness report
pub fn compute_readiness(history: &[HistoryEntry]) -> ReadinessReport {
    if history.is_empty() {
        return ReadinessReport::empty();
    }

    let total = history.len() as u64;
    let score_sum: u64 = history.iter().map(|e| e.score as u64).sum();
    let overall_score = round_ratio(score_sum, total) as u8;

    let survived_count = history.iter().filter(|e| e.outcome.survived()).count() as u64;
    let survival_rate = round_ratio(survived_count * 100, total) as u8;

    let scenario_breakdown = breakdown_by_scenario(history);

    let top_strengths = top_n(history.iter().flat_map(|e| e.good.iter()), TOP_LABELS);
    let top_weaknesses = top_n(history.iter().flat_map(|e| e.bad.iter()), TOP_LABELS);
    let fatal_mistakes = distinct_first(history.iter().flat_map(|e| e.fatal_errors.iter()), MAX_FATAL_MISTAKES);

    let tier = Tier::from_score(overall_score);
    let recommendation = recommend(overall_score, &top_weaknesses, &fatal_mistakes);

    ReadinessReport {
        overall_score,
        tier,
        total_attempts: total as u32,
        survived_count: survived_count as u32,
        survival_rate,
        scenario_breakdown,
        top_strengths,
        top_weaknesses,
        fatal_mistakes,
        recommendation,
    }
}

/// `round(num / den)` with halves rounded up; `den` must be non-zero
fn round_ratio(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

fn breakdown_by_scenario(history: &[HistoryEntry]) -> Vec<ScenarioBreakdown> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<ScenarioBreakdown> = Vec::new();

    for entry in history {
        match index.get(entry.scenario_id.as_str()).copied() {
            Some(i) => {
                let group = &mut groups[i];
                group.best_score = group.best_score.max(entry.score);
                group.attempts += 1;
            }
            None => {
                index.insert(entry.scenario_id.as_str(), groups.len());
                groups.push(ScenarioBreakdown {
                    id: entry.scenario_id.clone(),
                    title: entry.scenario_title.clone(),
                    city: entry.city.clone(),
                    scenario_type: entry.scenario_type.clone(),
                    best_score: entry.score,
                    attempts: 1,
                    last_outcome: entry.outcome,
                });
            }
        }
    }

    groups
}

/// Most frequent labels; equal counts keep first-seen order
fn top_n<'a>(labels: impl Iterator<Item = &'a String>, n: usize) -> Vec<String> {
    // (label, count, first-seen index)
    let mut counts: Vec<(&'a str, usize, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for label in labels {
        match index.get(label.as_str()).copied() {
            Some(i) => counts[i].1 += 1,
            None => {
                let first_seen = counts.len();
                index.insert(label.as_str(), first_seen);
                counts.push((label.as_str(), 1, first_seen));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    counts.into_iter().take(n).map(|(label, _, _)| label.to_string()).collect()
}

fn distinct_first<'a>(labels: impl Iterator<Item = &'a String>, n: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for label in labels {
        if seen.len() == n {
            break;
        }
        if !seen.contains(label) {
            seen.push(label.clone());
        }
    }
    seen
}

fn recommend(overall_score: u8, weaknesses: &[String], fatal_mistakes: &[String]) -> String {
    if !fatal_mistakes.is_empty() {
        return format!(
            "PRIORITY: Eliminate fatal errors — you gave dangerous advice in {} session(s). \
             This must be corrected before field deployment.",
            fatal_mistakes.len()
        );
    }
    if let Some(worst) = weaknesses.first() {
        return format!(
            "Focus area: \"{}\" — this was your most consistent gap. Practice until it becomes \
             automatic in the first 15 seconds of a call.",
            worst
        );
    }
    if overall_score >= 80 {
        return "Strong performance. Continue drilling edge-case scenarios to reach Expert level."
            .to_string();
    }
    "Keep practicing. Aim for consistent location confirmation and reassurance in every call."
        .to_string()
}
