// Layered configuration for kineia: defaults, then a JSON/TOML/YAML file, then KINEIA_* env vars

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Instance-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub name: String,
    /// error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name: "kineia".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Gesture playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Play gestures at all (on by default)
    pub enabled: bool,

    /// Divides every pause (0.5-2.0, default 1.0)
    pub animation_speed: f64,

    /// Ask the renderer to smooth each rotation
    pub smooth: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            animation_speed: 1.0,
            smooth: true,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.animation_speed.is_finite() || !(0.5..=2.0).contains(&self.animation_speed) {
            return Err("Animation speed must be between 0.5 and 2.0".to_string());
        }
        Ok(())
    }
}

/// Speech recognizer settings handed to the platform recognizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// BCP-47 language tag
    pub language: String,

    /// Request partial transcripts (only final ones drive playback)
    pub partial_results: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "es-ES".to_string(),
            partial_results: false,
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> Result<(), String> {
        let language = self.language.trim();
        if language.is_empty() {
            return Err("Speech language cannot be empty".to_string());
        }
        if language.len() > 35 {
            return Err("Speech language tag too long (max 35 chars)".to_string());
        }
        if !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err("Speech language tag contains invalid characters".to_string());
        }
        Ok(())
    }
}

/// Avatar model placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub asset_path: String,
    pub scale_to_units: f32,
    /// Vertical offset applied once the model is placed in the scene
    pub offset_y: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            asset_path: "models/Esqueleto.glb".to_string(),
            scale_to_units: 1.5,
            offset_y: -1.0,
        }
    }
}

/// Complete kineia configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KineiaConfig {
    pub instance: InstanceConfig,
    pub playback: PlaybackConfig,
    pub speech: SpeechConfig,
    pub model: ModelConfig,
}

impl KineiaConfig {
    /// Load configuration from a file (JSON, TOML or YAML)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_str(&content)
    }

    /// Load configuration from string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        // Try JSON first
        if let Ok(config) = serde_json::from_str::<KineiaConfig>(content) {
            return Ok(config);
        }

        // Try TOML
        if let Ok(config) = toml::from_str::<KineiaConfig>(content) {
            return Ok(config);
        }

        // Try YAML
        if let Ok(config) = serde_yaml::from_str::<KineiaConfig>(content) {
            return Ok(config);
        }

        Err(ConfigError::ParseError("Unknown format".to_string()))
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay KINEIA_* environment variables onto this configuration
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("KINEIA_LOG_LEVEL") {
            self.instance.log_level = level;
        }

        if let Some(speed) = lookup("KINEIA_ANIMATION_SPEED") {
            match speed.parse::<f64>() {
                Ok(s) => self.playback.animation_speed = s,
                Err(_) => tracing::warn!("Ignoring KINEIA_ANIMATION_SPEED={}: not a number", speed),
            }
        }

        if let Some(smooth) = lookup("KINEIA_SMOOTH") {
            match smooth.parse::<bool>() {
                Ok(s) => self.playback.smooth = s,
                Err(_) => tracing::warn!("Ignoring KINEIA_SMOOTH={}: expected true or false", smooth),
            }
        }

        if let Some(language) = lookup("KINEIA_LANGUAGE") {
            self.speech.language = language;
        }

        if let Some(path) = lookup("KINEIA_MODEL_PATH") {
            self.model.asset_path = path;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.instance.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.instance.log_level
            )));
        }

        self.playback
            .validate()
            .map_err(ConfigError::ValidationError)?;
        self.speech.validate().map_err(ConfigError::ValidationError)?;

        if !self.model.scale_to_units.is_finite() || self.model.scale_to_units <= 0.0 {
            return Err(ConfigError::ValidationError(
                "model.scale_to_units must be > 0".to_string(),
            ));
        }
        if self.model.asset_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.asset_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Render as TOML (used by `kineia config`)
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Configuration(err.to_string())
    }
}
