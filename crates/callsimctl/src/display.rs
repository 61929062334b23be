//! Human-readable rendering for callsimctl output.
//!
//! Every function returns a `String` so output can be checked in tests.

use callsim_common::FallbackReason;
use callsim_shared::{EvaluationResult, HistoryEntry, Outcome, ReadinessReport, Scenario, SpeechAnalysis, Tier};
use owo_colors::OwoColorize;
use std::fmt::Write;

const HR: &str = "────────────────────────────────────────────────────────────";

fn outcome_label(outcome: Outcome) -> String {
    match outcome {
        Outcome::Alive => "ALIVE".green().bold().to_string(),
        Outcome::Dead => "DEAD".red().bold().to_string(),
    }
}

fn score_label(score: u8) -> String {
    let text = format!("{}/100", score);
    match score {
        80..=100 => text.green().to_string(),
        50..=79 => text.yellow().to_string(),
        _ => text.red().to_string(),
    }
}

pub fn format_scenarios(scenarios: &[Scenario]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:14} {:8} {:16} {:10} {}", "ID", "TYPE", "TITLE", "SEVERITY", "CITY");
    let _ = writeln!(out, "{}", HR.dimmed());
    for s in scenarios {
        let _ = writeln!(
            out,
            "{:14} {:8} {:16} {:10} {}, {}",
            s.id.cyan(),
            s.incident_type.as_str(),
            s.title,
            s.severity.to_string(),
            s.city,
            s.country
        );
    }
    out
}

pub fn format_evaluation(result: &EvaluationResult, fallback: Option<&FallbackReason>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", outcome_label(result.outcome), score_label(result.score));

    let source = match fallback {
        None => "remote evaluator".to_string(),
        Some(FallbackReason::NotConfigured) => "local evaluator".to_string(),
        Some(reason) => format!("local evaluator ({})", reason),
    };
    let _ = writeln!(out, "{}", format!("source: {}", source).dimmed());
    let _ = writeln!(out, "{}", HR.dimmed());
    let _ = writeln!(out, "{}\n", result.summary);

    for good in &result.good {
        let _ = writeln!(out, "  {} {}", "✓".green(), good);
    }
    for bad in &result.bad {
        let _ = writeln!(out, "  {} {}", "✗".yellow(), bad);
    }
    for fatal in &result.fatal_errors {
        let _ = writeln!(out, "  {} {}", "☠".red(), fatal.red());
    }

    let _ = writeln!(out, "\n{}", result.detailed_feedback);
    out
}

pub fn format_speech(analysis: &SpeechAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Speech metrics".bold());
    let _ = writeln!(out, "  {:16} {}", "clarity", score_label(analysis.clarity_score));
    let _ = writeln!(out, "  {:16} {} wpm", "pace", analysis.pace_wpm);
    let _ = writeln!(out, "  {:16} {}", "hesitations", analysis.hesitations);
    let phrases = if analysis.key_phrases_used.is_empty() {
        "none".to_string()
    } else {
        analysis.key_phrases_used.join(", ")
    };
    let _ = writeln!(out, "  {:16} {}", "key phrases", phrases);

    for rec in &analysis.recommendations {
        let _ = writeln!(out, "  {} {}", "→".cyan(), rec);
    }
    out
}

fn tier_label(tier: Tier) -> String {
    match tier {
        Tier::Expert | Tier::Proficient => tier.as_str().green().bold().to_string(),
        Tier::Competent => tier.as_str().yellow().bold().to_string(),
        Tier::Trainee | Tier::Rookie => tier.as_str().red().bold().to_string(),
    }
}

pub fn format_readiness(report: &ReadinessReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", tier_label(report.tier), score_label(report.overall_score));
    let _ = writeln!(
        out,
        "{} attempts, {} survived ({}%)",
        report.total_attempts, report.survived_count, report.survival_rate
    );
    let _ = writeln!(out, "{}", HR.dimmed());

    if !report.scenario_breakdown.is_empty() {
        let _ = writeln!(out, "  {:14} {:>6} {:>9} {}", "Scenario", "Best", "Attempts", "Last");
        for s in &report.scenario_breakdown {
            let _ = writeln!(out, "  {:14} {:>6} {:>9} {}", s.id, s.best_score, s.attempts, s.last_outcome);
        }
        let _ = writeln!(out);
    }

    let sections: [(&str, &Vec<String>); 3] = [
        ("Strengths", &report.top_strengths),
        ("Weaknesses", &report.top_weaknesses),
        ("Fatal mistakes", &report.fatal_mistakes),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", title.bold());
        for item in items {
            let _ = writeln!(out, "  • {}", item);
        }
    }

    let _ = writeln!(out, "\n{}", report.recommendation);
    out
}

pub fn format_history(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return "No sessions recorded.\n".to_string();
    }
    let mut out = String::new();
    for entry in history {
        let _ = writeln!(
            out,
            "{}  {:14} {:6} {}  {}",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.scenario_id,
            entry.score,
            outcome_label(entry.outcome),
            entry.city
        );
    }
    out
}
