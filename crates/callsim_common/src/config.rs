//! Callsim configuration.
//!
//! Config file: `--config`, `$CALLSIM_CONFIG`, or ~/.config/callsim/config.toml.
//! Remote credentials normally come from `MINIMAX_API_KEY` / `MINIMAX_GROUP_ID`.

use anyhow::{Context, Result};
use callsim_shared::{CallsimError, CriteriaTable, ProfileSpec, HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CALLSIM_CONFIG";
pub const API_KEY_ENV: &str = "MINIMAX_API_KEY";
pub const GROUP_ID_ENV: &str = "MINIMAX_GROUP_ID";

/// Remote evaluator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Set false to always evaluate locally
    pub enabled: bool,
    pub endpoint: String,
    /// Model for the OpenAI-style endpoint
    pub model: String,
    /// Model for the GroupId endpoint
    pub group_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.minimax.io".to_string(),
            model: "MiniMax-Text-01".to_string(),
            group_model: "abab6.5s-chat".to_string(),
            api_key: None,
            group_id: None,
            timeout_secs: 10,
            temperature: 0.2,
            max_tokens: 900,
        }
    }
}

impl RemoteConfig {
    /// API key if the remote path should be attempted at all
    pub fn credentials(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Non-empty group id, selecting the GroupId endpoint
    pub fn group(&self) -> Option<&str> {
        self.group_id.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }
}

/// History store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Override for the history file; `~/` is expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            capacity: HISTORY_CAPACITY,
        }
    }
}

impl HistoryConfig {
    /// Configured path, or the per-user data directory
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(expand_home(path)),
            None => default_history_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallsimConfig {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    /// Extra criteria profiles keyed by scenario id
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileSpec>,
}

impl CallsimConfig {
    /// Default user config path: ~/.config/callsim/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("callsim").join("config.toml"))
    }

    /// Load configuration and apply environment overrides
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. `$CALLSIM_CONFIG` (must exist)
    /// 3. User config, if present
    /// 4. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load_from(&path)?,
            None => match Self::user_config_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };

        Ok(config.with_env_overrides(std::env::var(API_KEY_ENV).ok(), std::env::var(GROUP_ID_ENV).ok()))
    }

    /// Parse one config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: CallsimConfig =
            toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Environment credentials win over file values when set and non-empty
    pub fn with_env_overrides(mut self, api_key: Option<String>, group_id: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.remote.api_key = Some(key);
        }
        if let Some(group) = group_id.filter(|g| !g.trim().is_empty()) {
            self.remote.group_id = Some(group);
        }
        self
    }

    /// Built-in criteria plus any configured profiles
    pub fn criteria_table(&self) -> Result<CriteriaTable, CallsimError> {
        let mut table = CriteriaTable::compile_builtin()?;
        for (id, spec) in &self.profiles {
            table.insert_spec(id, spec)?;
        }
        Ok(table)
    }
}

/// ~/.local/share/callsim/history.json
pub fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("callsim").join("history.json"))
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
