//! Tests for the remote-assisted evaluator using fake backends.

use callsim_common::{FakeCompletionBackend, FallbackReason, RemoteAssistedEvaluator, RemoteError, RemoteVerdict};
use callsim_shared::{evaluate, CriterionEvaluator, Outcome, VerdictRejection};
use std::sync::Arc;
use std::time::Duration;

const TRANSCRIPT: &str = "CALLER: I've been shot!\n\
                          OPERATOR: Where are you right now?\n\
                          OPERATOR: Press on the wound. An ambulance is being dispatched.";

const REMOTE_ALIVE: &str = r#"```json
{"outcome":"alive","score":95,"good":["Asked for exact location","Applied pressure"],"bad":[],"fatal_errors":[],"summary":"Good call.","detailed_feedback":"Operator said 'press on the wound'."}
```"#;

fn assisted(backend: FakeCompletionBackend, deadline: Duration) -> RemoteAssistedEvaluator<'static> {
    RemoteAssistedEvaluator::new(CriterionEvaluator::default(), Arc::new(backend), deadline)
}

#[tokio::test]
async fn test_accepts_valid_remote_verdict() {
    let evaluator = assisted(FakeCompletionBackend::always_reply(REMOTE_ALIVE), Duration::from_secs(5));

    let (result, fallback) = evaluator.evaluate_with_source("gsw-nyc", TRANSCRIPT).await;
    assert!(fallback.is_none());
    assert_eq!(result.outcome, Outcome::Alive);
    assert_eq!(result.score, 95);
    assert_eq!(result.summary, "Good call.");
}

#[tokio::test]
async fn test_prompt_carries_scenario_and_transcript() {
    let backend = Arc::new(FakeCompletionBackend::always_reply(REMOTE_ALIVE));
    let evaluator = RemoteAssistedEvaluator::new(CriterionEvaluator::default(), backend.clone(), Duration::from_secs(5));

    let verdict = evaluator.request_verdict("fire-tky", TRANSCRIPT).await;
    assert!(matches!(verdict, RemoteVerdict::Accepted(_)));
    assert_eq!(backend.call_count(), 1);

    let prompt = backend.last_prompt().unwrap();
    assert!(prompt.contains("SCENARIO: Building Fire"));
    assert!(prompt.contains("2. Told caller to stay low below the smoke"));
    assert!(prompt.contains("Press on the wound"));
}

#[tokio::test]
async fn test_blank_transcript_sends_placeholder() {
    let backend = Arc::new(FakeCompletionBackend::always_reply(REMOTE_ALIVE));
    let evaluator = RemoteAssistedEvaluator::new(CriterionEvaluator::default(), backend.clone(), Duration::from_secs(5));

    evaluator.request_verdict("unknown-incident", "  ").await;
    let prompt = backend.last_prompt().unwrap();
    assert!(prompt.contains("[No speech captured]"));
    assert!(prompt.contains("SCENARIO: Emergency Call"));
}

#[tokio::test]
async fn test_malformed_reply_falls_back() {
    let evaluator = assisted(FakeCompletionBackend::always_reply("Sorry, I can't help with that."), Duration::from_secs(5));

    let (result, fallback) = evaluator.evaluate_with_source("gsw-nyc", TRANSCRIPT).await;
    assert_eq!(fallback, Some(FallbackReason::Rejected(VerdictRejection::NoObject)));
    assert_eq!(result, evaluate("gsw-nyc", TRANSCRIPT));
}

#[tokio::test]
async fn test_inconsistent_reply_falls_back() {
    let inconsistent = r#"{"outcome":"alive","score":40,"good":[],"bad":["MISSED: location"],"fatal_errors":["told caller to run"],"summary":"","detailed_feedback":""}"#;
    let evaluator = assisted(FakeCompletionBackend::always_reply(inconsistent), Duration::from_secs(5));

    let (result, fallback) = evaluator.evaluate_with_source("gsw-nyc", TRANSCRIPT).await;
    assert!(matches!(fallback, Some(FallbackReason::Rejected(VerdictRejection::InconsistentOutcome { .. }))));
    assert_eq!(result, evaluate("gsw-nyc", TRANSCRIPT));
}

#[tokio::test]
async fn test_transport_error_falls_back() {
    let evaluator = assisted(FakeCompletionBackend::always_error(RemoteError::Status(503)), Duration::from_secs(5));

    let (result, fallback) = evaluator.evaluate_with_source("cardiac-lon", TRANSCRIPT).await;
    assert_eq!(fallback, Some(FallbackReason::Remote(RemoteError::Status(503))));
    assert_eq!(result, evaluate("cardiac-lon", TRANSCRIPT));
}

#[tokio::test]
async fn test_timeout_matches_local_result() {
    let slow = FakeCompletionBackend::always_reply(REMOTE_ALIVE).with_delay(Duration::from_millis(500));
    let deadline = Duration::from_millis(20);
    let evaluator = assisted(slow, deadline);

    let (result, fallback) = evaluator.evaluate_with_source("gsw-nyc", TRANSCRIPT).await;
    assert_eq!(fallback, Some(FallbackReason::Timeout(deadline)));
    assert_eq!(result, evaluate("gsw-nyc", TRANSCRIPT));
    assert_ne!(result.score, 95);
}

#[tokio::test]
async fn test_local_only_never_calls_backend() {
    let evaluator = RemoteAssistedEvaluator::local_only(CriterionEvaluator::default());
    assert!(!evaluator.has_backend());

    let verdict = evaluator.request_verdict("gsw-nyc", TRANSCRIPT).await;
    assert_eq!(verdict, RemoteVerdict::Fallback(FallbackReason::NotConfigured));
    assert_eq!(evaluator.evaluate("gsw-nyc", TRANSCRIPT).await, evaluate("gsw-nyc", TRANSCRIPT));
}

#[tokio::test]
async fn test_sequence_of_replies() {
    let backend = FakeCompletionBackend::new(vec![
        Err(RemoteError::Timeout(10)),
        Ok(REMOTE_ALIVE.to_string()),
    ]);
    let evaluator = assisted(backend, Duration::from_secs(5));

    let (_, first) = evaluator.evaluate_with_source("gsw-nyc", TRANSCRIPT).await;
    assert_eq!(first, Some(FallbackReason::Remote(RemoteError::Timeout(10))));

    let (second, fallback) = evaluator.evaluate_with_source("gsw-nyc", TRANSCRIPT).await;
    assert!(fallback.is_none());
    assert_eq!(second.score, 95);
}
