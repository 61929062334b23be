//! History store for completed sessions.
//!
//! A single JSON array, most-recent-first, capped at the configured
//! capacity. A missing file is an empty history. Undecodable contents are
//! logged and treated as empty; any other read failure is an error so an
//! append never overwrites a file it could not see.

use crate::config::HistoryConfig;
use callsim_shared::history::push_front_capped;
use callsim_shared::{CallsimError, HistoryEntry};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// History store backed by a JSON file
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Result<Self, CallsimError> {
        let path = config
            .resolved_path()
            .ok_or_else(|| CallsimError::History("cannot determine data directory".to_string()))?;
        Ok(Self::new(path, config.capacity))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, most recent first; empty when the file cannot be used
    pub fn read(&self) -> Vec<HistoryEntry> {
        self.load().unwrap_or_else(|e| {
            warn!("cannot read history at {}: {}", self.path.display(), e);
            Vec::new()
        })
    }

    /// Prepend an entry and trim to capacity
    pub fn append(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, CallsimError> {
        let mut history = self.load()?;
        push_front_capped(&mut history, entry, self.capacity);
        self.write(&history)?;
        Ok(history)
    }

    pub fn clear(&self) -> Result<(), CallsimError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<HistoryEntry>, CallsimError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("ignoring undecodable history at {}: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("ignoring unreadable history at {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, history: &[HistoryEntry]) -> Result<(), CallsimError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Replaced atomically via rename
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(history)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
