//! Evaluation result types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary verdict for a call. Always derived, never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Alive,
    Dead,
}

impl Outcome {
    /// Dead iff any critical step was missed or any fatal error occurred
    pub fn derive(missed_critical: usize, fatal_errors: usize) -> Self {
        if missed_critical > 0 || fatal_errors > 0 {
            Outcome::Dead
        } else {
            Outcome::Alive
        }
    }

    pub fn survived(&self) -> bool {
        matches!(self, Outcome::Alive)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Alive => f.write_str("alive"),
            Outcome::Dead => f.write_str("dead"),
        }
    }
}

/// Output of one evaluation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub outcome: Outcome,
    /// 0-100 inclusive
    pub score: u8,
    /// Satisfied critical steps, profile order
    pub good: Vec<String>,
    /// Missed critical steps, marked as missed
    pub bad: Vec<String>,
    pub fatal_errors: Vec<String>,
    pub summary: String,
    pub detailed_feedback: String,
}

impl EvaluationResult {
    /// Whether `outcome` agrees with the missed/fatal lists
    pub fn is_consistent(&self) -> bool {
        self.score <= 100 && self.outcome == Outcome::derive(self.bad.len(), self.fatal_errors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_derive() {
        assert_eq!(Outcome::derive(0, 0), Outcome::Alive);
        assert_eq!(Outcome::derive(1, 0), Outcome::Dead);
        assert_eq!(Outcome::derive(0, 1), Outcome::Dead);
    }

    #[test]
    fn test_outcome_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Dead).unwrap(), "\"dead\"");
        let parsed: Outcome = serde_json::from_str("\"alive\"").unwrap();
        assert_eq!(parsed, Outcome::Alive);
    }

    #[test]
    fn test_consistency_check() {
        let mut result = EvaluationResult {
            outcome: Outcome::Alive,
            score: 100,
            good: vec!["Asked for location".to_string()],
            bad: vec![],
            fatal_errors: vec![],
            summary: String::new(),
            detailed_feedback: String::new(),
        };
        assert!(result.is_consistent());

        result.fatal_errors.push("Told caller to run".to_string());
        assert!(!result.is_consistent());

        result.outcome = Outcome::Dead;
        assert!(result.is_consistent());

        result.score = 140;
        assert!(!result.is_consistent());
    }
}
