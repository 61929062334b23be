//! Callsimctl library - exposes command and display modules for testing

pub mod commands;
pub mod display;
pub mod transcript;

/// Environment variable holding the tracing filter
pub const LOG_ENV: &str = "CALLSIM_LOG";
