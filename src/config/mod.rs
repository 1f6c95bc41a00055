use crate::tui::components::dialogs::{DialogError, DialogResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transition effect applied to every new dialog
    pub default_effect: Option<String>,

    /// How long an effect runs before a hidden dialog is detached
    pub hide_transition_ms: u64,

    /// Interval between ticks of the event loop
    pub tick_rate_ms: u64,

    /// Capture mouse events (close affordance and overlay clicks)
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_effect: None,
            hide_transition_ms: 500,
            tick_rate_ms: 50,
            mouse: true,
        }
    }
}

impl Config {
    /// Initialize configuration from defaults, the first config file found
    /// and the environment, in that order
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        if let Some(path) = Self::config_paths().into_iter().find(|path| path.exists()) {
            config = Self::load_from_file(&path).await?;
        }

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Candidate configuration files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.dialogkit.json"),
            PathBuf::from("./dialogkit.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("dialogkit").join("dialogkit.json"));
        }

        config_paths
    }

    /// Load configuration from a JSON file. Missing keys keep their defaults.
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.load_from_lookup(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key/value source
    pub fn load_from_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(effect) = lookup("DIALOGKIT_EFFECT") {
            self.default_effect = Some(effect).filter(|effect| !effect.is_empty());
        }

        if let Some(ms) = lookup("DIALOGKIT_TRANSITION_MS").and_then(|v| v.parse().ok()) {
            self.hide_transition_ms = ms;
        }

        if let Some(ms) = lookup("DIALOGKIT_TICK_MS").and_then(|v| v.parse().ok()) {
            self.tick_rate_ms = ms;
        }

        if let Some(mouse) = lookup("DIALOGKIT_MOUSE") {
            self.mouse = mouse.to_lowercase() == "true";
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> DialogResult<()> {
        if self.tick_rate_ms == 0 {
            return Err(DialogError::InvalidConfig(
                "tick_rate_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
