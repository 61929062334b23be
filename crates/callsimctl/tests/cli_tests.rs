//! CLI argument and command tests for callsimctl.

use callsim_common::{CallsimConfig, HistoryStore};
use callsimctl::commands::{evaluate_cmd, history_entry, readiness_cmd, EvaluateArgs};
use callsim_shared::{evaluate, Outcome};
use std::fs;
use tempfile::TempDir;

const TRANSCRIPT: &str = "CALLER: My husband collapsed, he's not breathing!\n\
                          OPERATOR: What is your address?\n\
                          OPERATOR: Is he breathing? Start CPR, push hard on the chest.\n\
                          OPERATOR: An ambulance is on the way.";

fn config_in(dir: &TempDir) -> CallsimConfig {
    let mut config = CallsimConfig::default();
    config.remote.enabled = false;
    config.history.path = Some(dir.path().join("history.json"));
    config
}

#[tokio::test]
async fn test_evaluate_saves_local_result() {
    let dir = TempDir::new().unwrap();
    let transcript = dir.path().join("call.txt");
    fs::write(&transcript, TRANSCRIPT).unwrap();
    let config = config_in(&dir);

    evaluate_cmd(
        &config,
        EvaluateArgs {
            scenario: "cardiac-lon".to_string(),
            transcript: Some(transcript),
            local: false,
            save: true,
            json: true,
        },
    )
    .await
    .unwrap();

    let history = HistoryStore::from_config(&config.history).unwrap().read();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].scenario_id, "cardiac-lon");
    assert_eq!(history[0].city, "London");
    assert_eq!(history[0].outcome, Outcome::Alive);
    assert_eq!(history[0].score, 100);
}

#[tokio::test]
async fn test_evaluate_rejects_unknown_scenario() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let err = evaluate_cmd(
        &config,
        EvaluateArgs {
            scenario: "alien-invasion".to_string(),
            local: true,
            ..EvaluateArgs::default()
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Scenario not found: alien-invasion"));
    assert!(!dir.path().join("history.json").exists());
}

#[test]
fn test_readiness_over_saved_history() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = HistoryStore::from_config(&config.history).unwrap();

    store.append(history_entry("cardiac-lon", &evaluate("cardiac-lon", TRANSCRIPT))).unwrap();
    store.append(history_entry("gsw-nyc", &evaluate("gsw-nyc", ""))).unwrap();

    readiness_cmd(&config, true).unwrap();
    let report = callsim_shared::compute_readiness(&store.read());
    assert_eq!(report.total_attempts, 2);
    assert_eq!(report.overall_score, 50);
    assert_eq!(report.scenario_breakdown[0].id, "gsw-nyc");
}
