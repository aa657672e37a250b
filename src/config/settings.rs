//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::interview::Difficulty;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Mock interview defaults
    #[serde(default)]
    pub interview: InterviewSettings,

    /// Backend adapter selection
    #[serde(default)]
    pub backend: BackendSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for the local database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSettings {
    /// Speak interviewer questions through text-to-speech
    #[serde(default = "default_true")]
    pub voice_enabled: bool,

    /// Play synthesized questions as soon as they are asked
    #[serde(default = "default_true")]
    pub auto_play: bool,

    /// Planned session length in minutes
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,

    /// Number of completed sessions kept in history
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Difficulty used when none is given
    #[serde(default)]
    pub default_difficulty: Difficulty,

    /// Voice name passed to text-to-speech
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speech rate multiplier
    #[serde(default = "default_voice_speed")]
    pub voice_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Backend adapter (stub, memory, gemini)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key (for cloud providers)
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "alchemist", "alchemist")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/alchemist"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_duration_minutes() -> u32 {
    30
}

fn default_max_history() -> usize {
    50
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_voice_speed() -> f32 {
    1.0
}

fn default_provider() -> String {
    "stub".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    45
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            voice_enabled: true,
            auto_play: true,
            duration_minutes: default_duration_minutes(),
            max_history: default_max_history(),
            default_difficulty: Difficulty::default(),
            voice: default_voice(),
            voice_speed: default_voice_speed(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model: default_model(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse settings from TOML text, filling unspecified keys with defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("ALCHEMIST_BACKEND") {
            if !provider.trim().is_empty() {
                self.backend.provider = provider.trim().to_string();
            }
        }

        if self.backend.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("ALCHEMIST_GEMINI_API_KEY") {
                if !key.trim().is_empty() {
                    self.backend.api_key = key;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "alchemist", "alchemist")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the database path
    pub fn database_path(&self) -> PathBuf {
        self.general.data_dir.join("alchemist.db")
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        Ok(())
    }
}
