//! Shared types and pure evaluation logic for callsim components.
//!
//! Everything in this crate is a deterministic function of its inputs:
//! no network, no filesystem, no logging. I/O collaborators live in
//! `callsim_common`.

pub mod criteria;
pub mod error;
pub mod evaluation;
pub mod evaluator;
pub mod history;
pub mod readiness;
pub mod scenario;
pub mod speech;
pub mod verdict;

pub use criteria::{CriteriaProfile, CriteriaTable, Criterion, CriterionSpec, Detector, ProfileSpec};
pub use error::CallsimError;
pub use evaluation::{EvaluationResult, Outcome};
pub use evaluator::{evaluate, CriterionEvaluator};
pub use history::{HistoryEntry, HISTORY_CAPACITY};
pub use readiness::{compute_readiness, ReadinessReport, ScenarioBreakdown, Tier};
pub use scenario::{get_scenario, scenarios, IncidentType, Scenario, Severity};
pub use speech::{analyze_speech_metrics, SpeechAnalysis};
pub use verdict::{parse_remote_verdict, VerdictRejection};

/// Marker that prefixes operator lines in role-tagged transcripts.
pub const OPERATOR_MARKER: &str = "OPERATOR:";
