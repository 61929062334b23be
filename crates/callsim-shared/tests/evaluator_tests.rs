//! Tests for the criterion evaluator.

use callsim_shared::criteria::{CriteriaTable, CriterionSpec, ProfileSpec};
use callsim_shared::evaluator::{evaluate, CriterionEvaluator, NO_SPEECH_BAD, NO_SPEECH_FATAL};
use callsim_shared::{scenarios, Outcome};

const GSW_MISSING_CALM: &str = "CALLER: Help... I've been shot... Central Park...
OPERATOR: 911, where are you right now?
CALLER: Near the fountain, please hurry.
OPERATOR: Press firmly on the wound with both hands.
OPERATOR: An ambulance has been dispatched to the fountain.";

#[test]
fn test_short_transcripts_fail_for_every_scenario() {
    let short = [
        "",
        "hello?",
        "OPERATOR: where are you stay calm ambulance",
        "one two three four five six seven eight",
    ];
    for scenario in scenarios() {
        for transcript in short {
            let result = evaluate(scenario.id, transcript);
            assert_eq!(result.outcome, Outcome::Dead, "{} / {:?}", scenario.id, transcript);
            assert_eq!(result.score, 0);
            assert!(result.good.is_empty());
            assert_eq!(result.bad, vec![NO_SPEECH_BAD]);
            assert_eq!(result.fatal_errors, vec![NO_SPEECH_FATAL]);
        }
    }
}

#[test]
fn test_outcome_invariant_across_table() {
    let transcripts = [
        "OPERATOR: hello there, I am on the line with you now, tell me more please",
        GSW_MISSING_CALM,
        "OPERATOR: what is the address? is she breathing? start cpr now. \
         an ambulance is on the way, stay calm, help is coming, the stairs, stay low",
        "OPERATOR: just run and jump out, leave now, move her, give her water, \
         you will get in trouble, sit up",
    ];
    let mut ids: Vec<&str> = scenarios().iter().map(|s| s.id).collect();
    ids.push("unknown-scenario");

    for id in ids {
        for transcript in transcripts {
            let result = evaluate(id, transcript);
            let expected = if result.bad.is_empty() && result.fatal_errors.is_empty() {
                Outcome::Alive
            } else {
                Outcome::Dead
            };
            assert_eq!(result.outcome, expected, "{}", id);
            assert!(result.score <= 100);
        }
    }
}

#[test]
fn test_gsw_missing_calm_step() {
    let result = evaluate("gsw-nyc", GSW_MISSING_CALM);

    assert_eq!(result.good.len(), 3);
    assert_eq!(result.bad, vec!["MISSED: Kept caller conscious and calm"]);
    assert!(result.fatal_errors.is_empty());
    assert_eq!(result.outcome, Outcome::Dead);
    assert_eq!(result.score, 80);
    assert!(result.summary.contains("missed 1 critical step(s)"));
    assert!(result.detailed_feedback.contains("1. Kept caller conscious and calm"));
}

#[test]
fn test_score_two_missed_one_fatal() {
    let transcript = "CALLER: She just collapsed!\n\
                      OPERATOR: Where exactly are you? An ambulance is coming.\n\
                      OPERATOR: Drag her away from the road and wait there.";
    let result = evaluate("cardiac-lon", transcript);

    assert_eq!(result.good.len(), 2);
    assert_eq!(result.bad.len(), 2);
    assert_eq!(result.fatal_errors.len(), 1);
    assert_eq!(result.score, 25);
    assert_eq!(result.outcome, Outcome::Dead);
}

#[test]
fn test_evaluation_is_deterministic() {
    let first = evaluate("gsw-nyc", GSW_MISSING_CALM);
    let second = evaluate("gsw-nyc", GSW_MISSING_CALM);
    assert_eq!(first, second);
}

#[test]
fn test_caller_lines_are_not_credited() {
    let transcript = "CALLER: I'm going to run to the street, stay calm they said\n\
                      OPERATOR: okay tell me what happened to you today sir";
    let result = evaluate("gsw-nyc", transcript);
    assert!(result.fatal_errors.is_empty());
    assert_eq!(result.bad.len(), 4);
    assert_eq!(result.score, 20);
}

#[test]
fn test_unmarked_transcript_is_evaluated_whole() {
    let transcript = "where are you? apply pressure to the wound. \
                      the ambulance is dispatched. stay with me.";
    let result = evaluate("gsw-nyc", transcript);
    assert_eq!(result.outcome, Outcome::Alive);
    assert_eq!(result.score, 100);
}

#[test]
fn test_unknown_scenario_generic_checklist() {
    let missed = evaluate(
        "unknown-scenario",
        "OPERATOR: hello there, I am on the line with you now, tell me more",
    );
    assert_eq!(missed.outcome, Outcome::Dead);
    assert_eq!(missed.score, 40);
    assert_eq!(
        missed.bad,
        vec![
            "MISSED: Did not ask for exact location",
            "MISSED: Never confirmed ambulance is on the way",
            "MISSED: Never reassured the caller",
        ]
    );
    assert!(missed.fatal_errors.is_empty());

    let passed = evaluate(
        "unknown-scenario",
        "OPERATOR: where are you? an ambulance is on its way, stay calm for me",
    );
    assert_eq!(passed.outcome, Outcome::Alive);
    assert_eq!(passed.good, vec!["Asked for location", "Confirmed help is coming", "Reassured the caller"]);
    assert!(passed.summary.contains("Emergency Call"));
}

#[test]
fn test_custom_profile_from_spec() {
    let mut table = CriteriaTable::compile_builtin().unwrap();
    table
        .insert_spec(
            "gas-leak",
            &ProfileSpec {
                critical: vec![
                    CriterionSpec::new("Asked for the address", "address"),
                    CriterionSpec::new("Told caller to get outside", "outside|leave the (house|building)"),
                ],
                fatal: vec![CriterionSpec::new("Told caller to use a light switch", "light switch|turn on the light")],
            },
        )
        .unwrap();

    let evaluator = CriterionEvaluator::new(&table);
    let result = evaluator.evaluate_titled(
        "gas-leak",
        "Gas Leak",
        "OPERATOR: what is the address? go outside now, and flip the light switch on the way",
    );
    assert_eq!(result.good.len(), 2);
    assert_eq!(result.fatal_errors, vec!["Told caller to use a light switch"]);
    assert_eq!(result.score, 65);
    assert!(result.detailed_feedback.starts_with("EVALUATION — GAS LEAK"));
}
