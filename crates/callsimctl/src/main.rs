//! Callsimctl - CLI for the dispatcher call evaluation engine.
//!
//! Evaluates call transcripts, reports speech metrics and aggregates
//! session history into a readiness rating.

use anyhow::Result;
use callsim_common::CallsimConfig;
use callsimctl::commands::{self, EvaluateArgs};
use callsimctl::LOG_ENV;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "callsimctl")]
#[command(about = "Emergency dispatcher call simulator - transcript evaluation", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $CALLSIM_CONFIG or ~/.config/callsim/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in incident scenarios
    Scenarios {
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a call transcript against a scenario
    Evaluate {
        /// Scenario id (e.g. "gsw-nyc")
        #[arg(long, short)]
        scenario: String,

        /// Transcript file, or "-" for stdin
        #[arg(long, short)]
        transcript: Option<PathBuf>,

        /// Skip the remote evaluator
        #[arg(long)]
        local: bool,

        /// Append the result to session history
        #[arg(long)]
        save: bool,

        #[arg(long)]
        json: bool,
    },

    /// Speech metrics for a transcript
    Speech {
        /// Transcript file, or "-" for stdin
        #[arg(long, short)]
        transcript: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Readiness report from session history
    Readiness {
        #[arg(long)]
        json: bool,
    },

    /// Show or clear session history
    History {
        #[arg(long)]
        clear: bool,

        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CallsimConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scenarios { json } => commands::scenarios_cmd(json),
        Commands::Evaluate {
            scenario,
            transcript,
            local,
            save,
            json,
        } => {
            let args = EvaluateArgs {
                scenario,
                transcript,
                local,
                save,
                json,
            };
            commands::evaluate_cmd(&config, args).await
        }
        Commands::Speech { transcript, json } => commands::speech_cmd(transcript, json),
        Commands::Readiness { json } => commands::readiness_cmd(&config, json),
        Commands::History { clear, json } => commands::history_cmd(&config, clear, json),
    }
}
