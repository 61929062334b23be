//! Criterion evaluator: transcript + scenario id -> verdict.
//!
//! Deterministic and local. This is the reference behaviour; the
//! remote-assisted path in `callsim_common` falls back to it on any failure.
//!
//! Pipeline:
//! 1. Content gate (8 or fewer words fails outright)
//! 2. Operator-line extraction (whole transcript if no markers)
//! 3. Criterion matching against the scenario profile
//! 4. Outcome + score
//! 5. Narrative

use crate::criteria::{CriteriaProfile, CriteriaTable};
use crate::evaluation::{EvaluationResult, Outcome};
use crate::scenario::get_scenario;
use crate::OPERATOR_MARKER;
use once_cell::sync::Lazy;
use regex::Regex;

/// Transcripts with this many words or fewer are treated as silent
pub const MIN_CONTENT_WORDS: usize = 8;

/// Points lost per missed critical step
pub const MISSED_STEP_PENALTY: i32 = 20;

/// Points lost per fatal error
pub const FATAL_ERROR_PENALTY: i32 = 35;

/// Title used when the scenario id is not in the catalog
pub const FALLBACK_TITLE: &str = "Emergency Call";

pub const NO_SPEECH_BAD: &str = "No operator speech detected";
pub const NO_SPEECH_FATAL: &str = "Operator did not respond to the caller";

static OPERATOR_MARKER_LOWER: Lazy<String> = Lazy::new(|| OPERATOR_MARKER.to_lowercase());

static OPERATOR_PREFIX: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)^.*{}\s*", regex::escape(OPERATOR_MARKER));
    Regex::new(&pattern).expect("operator prefix pattern")
});

/// Evaluates transcripts against a criteria table
#[derive(Debug, Clone, Copy)]
pub struct CriterionEvaluator<'a> {
    table: &'a CriteriaTable,
}

impl Default for CriterionEvaluator<'static> {
    fn default() -> Self {
        Self::new(CriteriaTable::builtin())
    }
}

impl<'a> CriterionEvaluator<'a> {
    pub fn new(table: &'a CriteriaTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a CriteriaTable {
        self.table
    }

    /// Evaluate using the catalog title for the scenario
    pub fn evaluate(&self, scenario_id: &str, transcript: &str) -> EvaluationResult {
        let title = get_scenario(scenario_id).map(|s| s.title).unwrap_or(FALLBACK_TITLE);
        self.evaluate_titled(scenario_id, title, transcript)
    }

    /// Evaluate with an explicit scenario title for the narrative
    pub fn evaluate_titled(&self, scenario_id: &str, title: &str, transcript: &str) -> EvaluationResult {
        if !has_content(transcript) {
            return no_speech_result();
        }

        let text = operator_text(transcript);
        let profile = self.table.profile_for(scenario_id);
        let matched = match_profile(profile, &text);

        let outcome = Outcome::derive(matched.missed.len(), matched.fatal_errors.len());
        let score = compute_score(matched.missed.len(), matched.fatal_errors.len());

        let summary = build_summary(outcome, title, score, &matched);
        let detailed_feedback = build_detailed(title, profile.critical.len(), &matched);

        EvaluationResult {
            outcome,
            score,
            good: matched.good,
            bad: matched.bad,
            fatal_errors: matched.fatal_errors,
            summary,
            detailed_feedback,
        }
    }
}

/// Evaluate against the built-in criteria table
pub fn evaluate(scenario_id: &str, transcript: &str) -> EvaluationResult {
    CriterionEvaluator::default().evaluate(scenario_id, transcript)
}

/// More than `MIN_CONTENT_WORDS` whitespace-separated words
pub fn has_content(transcript: &str) -> bool {
    transcript.split_whitespace().count() > MIN_CONTENT_WORDS
}

/// Lower-cased operator speech, or the whole transcript when no line is marked
pub fn operator_text(transcript: &str) -> String {
    let lines: Vec<String> = transcript
        .lines()
        .filter(|line| line.to_lowercase().contains(OPERATOR_MARKER_LOWER.as_str()))
        .map(|line| OPERATOR_PREFIX.replace(line, "").to_lowercase())
        .collect();

    let joined = lines.join(" ");
    if joined.is_empty() {
        transcript.to_lowercase()
    } else {
        joined
    }
}

/// `clamp(0, 100, 100 - missed*20 - fatal*35)`
pub fn compute_score(missed: usize, fatal: usize) -> u8 {
    let raw = 100 - missed as i32 * MISSED_STEP_PENALTY - fatal as i32 * FATAL_ERROR_PENALTY;
    raw.clamp(0, 100) as u8
}

#[derive(Debug, Default)]
struct ProfileMatch {
    good: Vec<String>,
    bad: Vec<String>,
    /// Labels of missed steps, unprefixed
    missed: Vec<String>,
    fatal_errors: Vec<String>,
}

fn match_profile(profile: &CriteriaProfile, text: &str) -> ProfileMatch {
    let mut m = ProfileMatch::default();

    for step in &profile.critical {
        if step.detector.matches(text) {
            m.good.push(step.label.clone());
        } else {
            m.bad.push(step.missed_label());
            m.missed.push(step.label.clone());
        }
    }

    for mistake in &profile.fatal {
        if mistake.detector.matches(text) {
            m.fatal_errors.push(mistake.label.clone());
        }
    }

    m
}

fn no_speech_result() -> EvaluationResult {
    EvaluationResult {
        outcome: Outcome::Dead,
        score: 0,
        good: Vec::new(),
        bad: vec![NO_SPEECH_BAD.to_string()],
        fatal_errors: vec![NO_SPEECH_FATAL.to_string()],
        summary: "No transcript captured. The patient received no guidance and did not survive."
            .to_string(),
        detailed_feedback: "No operator speech was recorded. Ensure your microphone is enabled, \
                            the call is connected and you speak clearly during the call."
            .to_string(),
    }
}

fn build_summary(outcome: Outcome, title: &str, score: u8, m: &ProfileMatch) -> String {
    match outcome {
        Outcome::Dead => {
            let harm = if m.fatal_errors.is_empty() {
                ""
            } else {
                " You also gave dangerous advice that directly harmed the patient."
            };
            format!(
                "PATIENT DECEASED. You missed {} critical step(s) during this {} call.{} \
                 In a real emergency this outcome would be irreversible.",
                m.missed.len(),
                title,
                harm
            )
        }
        Outcome::Alive => format!(
            "Patient survived. You completed all critical steps in the {} scenario. Score: {}/100.",
            title, score
        ),
    }
}

fn build_detailed(title: &str, critical_total: usize, m: &ProfileMatch) -> String {
    let mut out = format!(
        "EVALUATION — {}\n\nYou completed {} of {} critical steps.",
        title.to_uppercase(),
        m.good.len(),
        critical_total
    );

    if !m.missed.is_empty() {
        out.push_str("\n\nCRITICAL STEPS YOU MISSED:");
        for (i, step) in m.missed.iter().enumerate() {
            out.push_str(&format!("\n{}. {}", i + 1, step));
        }
    }

    if !m.fatal_errors.is_empty() {
        out.push_str("\n\nFATAL ERRORS:");
        for fatal in &m.fatal_errors {
            out.push_str(&format!("\n• {}", fatal));
        }
    }

    out.push_str(&format!(
        "\n\nOperator performance review: Each missed step above represents a real-world \
         failure point. In an actual {} emergency, the patient has minutes — sometimes seconds — \
         to survive. Memorize the critical checklist for this scenario and practice until it \
         is automatic within your first 15 seconds on the call.",
        title.to_lowercase()
    ));

    out
}
