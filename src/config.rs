//! Configuration for the taskdeck CLI.
//!
//! Search order:
//! 1. Explicit path if provided
//! 2. .taskdeck.yml in the current directory (project config)
//! 3. ~/.config/taskdeck/taskdeck.yml (user config)
//! 4. Default values

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project config file name looked up in the working directory
const PROJECT_CONFIG: &str = ".taskdeck.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the dashboard service
    pub api_root: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Interval the search debouncer waits for input to settle, milliseconds
    pub search_debounce_ms: u64,

    /// Extra diagnostics on stdout
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            search_debounce_ms: 250,
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from the standard search paths
    pub fn load(explicit_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let project = PathBuf::from(PROJECT_CONFIG);
        if project.exists() {
            return Self::from_file(&project);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("taskdeck").join("taskdeck.yml");
            if user.exists() {
                return Self::from_file(&user);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
