//! Remote verdict contract: prompt construction and response validation.
//!
//! Pure half of the remote-assisted evaluator. The HTTP half lives in
//! `callsim_common::remote`. A remote verdict is only accepted when it parses
//! into an `EvaluationResult` AND its outcome agrees with its own
//! `bad`/`fatal_errors` lists; anything else is a rejection and the caller
//! falls back to the local evaluator.

use crate::criteria::CriteriaProfile;
use crate::evaluation::{EvaluationResult, Outcome};
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are a 911 training evaluator. Reply with JSON only, no markdown.";

/// Stand-in sent when the transcript is blank
pub const NO_SPEECH_PLACEHOLDER: &str = "[No speech captured]";

const GENERIC_STEPS: &str = "Ask location, give first aid, confirm help coming, keep calm";

/// Why a remote response was not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerdictRejection {
    #[error("response contains no JSON object")]
    NoObject,

    #[error("response object does not match the evaluation shape: {0}")]
    Malformed(String),

    #[error("score {0} is outside 0-100")]
    ScoreOutOfRange(u8),

    #[error("outcome '{outcome}' contradicts {missed} missed step(s) and {fatal} fatal error(s)")]
    InconsistentOutcome {
        outcome: Outcome,
        missed: usize,
        fatal: usize,
    },
}

/// Build the strict evaluation prompt sent to the remote service
pub fn build_evaluation_prompt(title: &str, profile: Option<&CriteriaProfile>, transcript: &str) -> String {
    let trimmed = transcript.trim();
    let effective = if trimmed.is_empty() { NO_SPEECH_PLACEHOLDER } else { trimmed };

    let steps = match profile {
        Some(p) => p
            .critical
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {}", i + 1, c.label))
            .collect::<Vec<_>>()
            .join("\n"),
        None => GENERIC_STEPS.to_string(),
    };

    format!(
        r#"You are a strict 911 dispatcher training evaluator. Analyze ONLY the OPERATOR's lines in this transcript.

SCENARIO: {title}
CRITICAL STEPS THE OPERATOR MUST COMPLETE:
{steps}

TRANSCRIPT:
{effective}

Rules:
- If ANY critical step is completely missing, set outcome to "dead"
- If the operator said anything that would harm the patient, list it in fatal_errors and set outcome to "dead"
- Score starts at 100, subtract 20 per missed critical step, subtract 35 per fatal error
- Be very specific: name exactly what the operator said or failed to say

Respond ONLY with valid JSON:
{{
  "outcome": "alive",
  "score": 75,
  "good": ["specific action operator took"],
  "bad": ["specific critical step that was completely missed"],
  "fatal_errors": ["dangerous thing the operator said"],
  "summary": "2-3 sentences. Be blunt about what killed the patient if outcome is dead.",
  "detailed_feedback": "Specific paragraph. Quote the operator's words where relevant. Name exact steps missed."
}}"#
    )
}

/// Remove markdown code fences around a model reply
pub fn strip_code_fences(content: &str) -> String {
    content.replace("```json", "").replace("```", "").trim().to_string()
}

/// Outermost `{ ... }` span, if any
pub fn extract_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}

/// Parse and validate a remote reply into an evaluation result
pub fn parse_remote_verdict(content: &str) -> Result<EvaluationResult, VerdictRejection> {
    let cleaned = strip_code_fences(content);
    let object = extract_object(&cleaned).ok_or(VerdictRejection::NoObject)?;

    let result: EvaluationResult =
        serde_json::from_str(object).map_err(|e| VerdictRejection::Malformed(e.to_string()))?;

    validate(&result)?;
    Ok(result)
}

/// Check the outcome invariant on a result from outside this crate
pub fn validate(result: &EvaluationResult) -> Result<(), VerdictRejection> {
    if result.score > 100 {
        return Err(VerdictRejection::ScoreOutOfRange(result.score));
    }
    if !result.is_consistent() {
        return Err(VerdictRejection::InconsistentOutcome {
            outcome: result.outcome,
            missed: result.bad.len(),
            fatal: result.fatal_errors.len(),
        });
    }
    Ok(())
}
