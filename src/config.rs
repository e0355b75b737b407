use crate::defaults;
use crate::error::{Result, SignstreamError};
use crate::settings::{Language, Settings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub tracking: TrackingConfig,
    pub analysis: AnalysisConfig,
}

/// Classification and sentence-building configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    pub sensitivity: u8,
    pub language: Language,
    pub confidence_gate: f32,
    pub validation_frames: u32,
    /// Fixed seed for the fallback tier; entropy when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Hand tracker and frame loop configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackingConfig {
    pub max_hands: usize,
    pub frame_interval_ms: u64,
}

/// Semantic analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub enabled: bool,
    pub min_interval_ms: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
    pub model: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sensitivity: defaults::SENSITIVITY,
            language: Language::default(),
            confidence_gate: defaults::CONFIDENCE_GATE,
            validation_frames: defaults::VALIDATION_FRAMES,
            seed: None,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_hands: defaults::MAX_HANDS,
            frame_interval_ms: defaults::FRAME_INTERVAL_MS,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_ms: defaults::ANALYSIS_INTERVAL_MS,
            max_tokens: defaults::ANALYSIS_MAX_TOKENS,
            temperature: defaults::ANALYSIS_TEMPERATURE,
            timeout_ms: defaults::ANALYSIS_TIMEOUT_MS,
            model: defaults::ANALYSIS_MODEL.to_string(),
            base_url: defaults::ANALYSIS_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl DetectionConfig {
    /// Detection settings (sensitivity clamped into range).
    pub fn settings(&self) -> Settings {
        Settings::new(self.sensitivity, self.language)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound) =>
            {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.context(format!("Failed to load config from {}", path.display()))),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SIGNSTREAM_SENSITIVITY → detection.sensitivity
    /// - SIGNSTREAM_LANGUAGE → detection.language
    /// - SIGNSTREAM_API_KEY (or OPENAI_API_KEY) → analysis.api_key
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(sensitivity) = std::env::var("SIGNSTREAM_SENSITIVITY")
            && !sensitivity.is_empty()
        {
            match sensitivity.trim().parse() {
                Ok(value) => self.detection.sensitivity = value,
                Err(_) => tracing::warn!(%sensitivity, "ignoring invalid SIGNSTREAM_SENSITIVITY"),
            }
        }

        if let Ok(language) = std::env::var("SIGNSTREAM_LANGUAGE")
            && !language.is_empty()
        {
            match language.parse() {
                Ok(value) => self.detection.language = value,
                Err(e) => tracing::warn!(error = %e, "ignoring invalid SIGNSTREAM_LANGUAGE"),
            }
        }

        let api_key = ["SIGNSTREAM_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.is_empty());
        if let Some(key) = api_key {
            self.analysis.api_key = Some(key);
        }

        self
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, message: &str| SignstreamError::ConfigInvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        let sensitivity = self.detection.sensitivity;
        if !(defaults::MIN_SENSITIVITY..=defaults::MAX_SENSITIVITY).contains(&sensitivity) {
            return Err(invalid("detection.sensitivity", "must be between 1 and 10"));
        }
        if !(0.0..=1.0).contains(&self.detection.confidence_gate) {
            return Err(invalid("detection.confidence_gate", "must be between 0 and 1"));
        }
        if self.detection.validation_frames == 0 {
            return Err(invalid("detection.validation_frames", "must be at least 1"));
        }
        if self.tracking.max_hands == 0 {
            return Err(invalid("tracking.max_hands", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.analysis.temperature) {
            return Err(invalid("analysis.temperature", "must be between 0 and 2"));
        }
        if self.analysis.max_tokens == 0 {
            return Err(invalid("analysis.max_tokens", "must be at least 1"));
        }
        if self.analysis.timeout_ms == 0 {
            return Err(invalid("analysis.timeout_ms", "must be greater than 0"));
        }
        Ok(())
    }

    /// Serialize back to TOML, without the API key.
    pub fn to_toml_redacted(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.analysis.api_key.is_some() {
            shown.analysis.api_key = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| SignstreamError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/signstream/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("signstream")
            .join("config.toml")
    }
}
