//! Command implementations for callsimctl.

use crate::display;
use crate::transcript::read_transcript;
use anyhow::{Context, Result};
use callsim_common::{CallsimConfig, FallbackReason, HistoryStore, RemoteAssistedEvaluator};
use callsim_shared::evaluator::FALLBACK_TITLE;
use callsim_shared::{
    analyze_speech_metrics, compute_readiness, get_scenario, scenarios, CallsimError, CriteriaTable,
    CriterionEvaluator, EvaluationResult, HistoryEntry, SpeechAnalysis,
};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for `callsimctl evaluate`
#[derive(Debug, Clone, Default)]
pub struct EvaluateArgs {
    pub scenario: String,
    pub transcript: Option<PathBuf>,
    pub local: bool,
    pub save: bool,
    pub json: bool,
}

/// JSON shape of `evaluate --json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateReport {
    pub scenario_id: String,
    /// "remote" or "local"
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub evaluation: EvaluationResult,
    pub speech: SpeechAnalysis,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

pub fn scenarios_cmd(json: bool) -> Result<()> {
    if json {
        return print_json(&scenarios());
    }
    print!("{}", display::format_scenarios(scenarios()));
    Ok(())
}

/// Catalog ids and configured profile ids are accepted; anything else is rejected
pub fn require_known_scenario(table: &CriteriaTable, scenario_id: &str) -> Result<(), CallsimError> {
    if get_scenario(scenario_id).is_some() || table.get(scenario_id).is_some() {
        Ok(())
    } else {
        Err(CallsimError::UnknownScenario(scenario_id.to_string()))
    }
}

/// History record for any accepted scenario id
pub fn history_entry(scenario_id: &str, result: &EvaluationResult) -> HistoryEntry {
    match get_scenario(scenario_id) {
        Some(scenario) => HistoryEntry::from_evaluation(scenario, result, Utc::now()),
        None => HistoryEntry {
            scenario_id: scenario_id.to_string(),
            scenario_title: FALLBACK_TITLE.to_string(),
            scenario_type: "CUSTOM".to_string(),
            city: String::new(),
            score: result.score,
            outcome: result.outcome,
            good: result.good.clone(),
            bad: result.bad.clone(),
            fatal_errors: result.fatal_errors.clone(),
            date: Utc::now(),
        },
    }
}

pub async fn evaluate_cmd(config: &CallsimConfig, args: EvaluateArgs) -> Result<()> {
    let table = config.criteria_table().context("Invalid criteria profile in configuration")?;
    require_known_scenario(&table, &args.scenario)?;

    let transcript = read_transcript(args.transcript.as_deref())?;
    debug!("transcript has {} words", transcript.split_whitespace().count());

    let local = CriterionEvaluator::new(&table);
    let evaluator = if args.local {
        RemoteAssistedEvaluator::local_only(local)
    } else {
        RemoteAssistedEvaluator::from_config(local, &config.remote)
    };

    let (result, fallback) = evaluator.evaluate_with_source(&args.scenario, &transcript).await;
    let speech = analyze_speech_metrics(&transcript);

    if args.save {
        let store = HistoryStore::from_config(&config.history)?;
        store.append(history_entry(&args.scenario, &result))?;
        info!("saved session to {}", store.path().display());
    }

    if args.json {
        return print_json(&EvaluateReport {
            scenario_id: args.scenario,
            source: if fallback.is_none() { "remote" } else { "local" },
            fallback_reason: fallback.as_ref().map(FallbackReason::to_string),
            evaluation: result,
            speech,
        });
    }

    print!("{}", display::format_evaluation(&result, fallback.as_ref()));
    println!();
    print!("{}", display::format_speech(&speech));
    Ok(())
}

pub fn speech_cmd(transcript: Option<PathBuf>, json: bool) -> Result<()> {
    let transcript = read_transcript(transcript.as_deref())?;
    let analysis = analyze_speech_metrics(&transcript);
    if json {
        return print_json(&analysis);
    }
    print!("{}", display::format_speech(&analysis));
    Ok(())
}

pub fn readiness_cmd(config: &CallsimConfig, json: bool) -> Result<()> {
    let store = HistoryStore::from_config(&config.history)?;
    let report = compute_readiness(&store.read());
    if json {
        return print_json(&report);
    }
    print!("{}", display::format_readiness(&report));
    Ok(())
}

pub fn history_cmd(config: &CallsimConfig, clear: bool, json: bool) -> Result<()> {
    let store = HistoryStore::from_config(&config.history)?;
    if clear {
        store.clear()?;
        println!("History cleared.");
        return Ok(());
    }

    let history = store.read();
    if json {
        return print_json(&history);
    }
    print!("{}", display::format_history(&history));
    Ok(())
}
