//! Callsim Common - I/O collaborators around the pure evaluation engine.
//!
//! Configuration, the remote-assisted evaluator and the history store.

pub mod config;
pub mod history_store;
pub mod remote;

pub use config::{CallsimConfig, HistoryConfig, RemoteConfig};
pub use history_store::HistoryStore;
pub use remote::{
    CompletionBackend, FakeCompletionBackend, FallbackReason, HttpCompletionBackend, RemoteAssistedEvaluator,
    RemoteError, RemoteVerdict,
};
