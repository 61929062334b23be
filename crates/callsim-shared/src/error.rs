//! Error types for callsim.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallsimError {
    #[error("Scenario not found: {0}")]
    UnknownScenario(String),

    #[error("Invalid detector pattern for '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CallsimError {
    pub fn code(&self) -> i32 {
        match self {
            CallsimError::UnknownScenario(_) => 404,
            CallsimError::InvalidPattern { .. } => 422,
            CallsimError::Config(_) => 500,
            CallsimError::History(_) => 503,
            CallsimError::Io(_) => 510,
            CallsimError::Json(_) => 400,
        }
    }
}
