//! Detection settings and the controller that owns them.
//!
//! Sensitivity is baked into the hand tracker when it is constructed, so a
//! change while the pipeline runs cannot be applied in place: the controller
//! reports that a full reinitialize is needed and the pipeline performs it.

use crate::defaults;
use crate::pipeline::types::PipelineState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target sign language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// American Sign Language (canonical labels).
    #[default]
    #[serde(rename = "ASL")]
    Asl,
    /// Korean Sign Language.
    #[serde(rename = "KSL")]
    Ksl,
    /// British Sign Language.
    #[serde(rename = "BSL")]
    Bsl,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Asl, Language::Ksl, Language::Bsl];

    pub fn code(self) -> &'static str {
        match self {
            Language::Asl => "ASL",
            Language::Ksl => "KSL",
            Language::Bsl => "BSL",
        }
    }

    /// Human-readable name, used in analysis prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Asl => "American Sign Language",
            Language::Ksl => "Korean Sign Language",
            Language::Bsl => "British Sign Language",
        }
    }

    /// True for the language whose labels need no localization.
    pub fn is_default(self) -> bool {
        self == Language::Asl
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASL" => Ok(Language::Asl),
            "KSL" => Ok(Language::Ksl),
            "BSL" => Ok(Language::Bsl),
            other => Err(format!("unknown sign language '{other}' (expected ASL, KSL or BSL)")),
        }
    }
}

/// Tracker construction parameters derived from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    pub max_hands: usize,
    pub detection_threshold: f32,
    pub tracking_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Settings::default().tracker_config()
    }
}

/// User-tunable detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    sensitivity: u8,
    language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: defaults::SENSITIVITY,
            language: Language::default(),
        }
    }
}

impl Settings {
    /// Creates settings, clamping sensitivity into 1..=10.
    pub fn new(sensitivity: u8, language: Language) -> Self {
        Self {
            sensitivity: clamp_sensitivity(sensitivity),
            language,
        }
    }

    pub fn sensitivity(&self) -> u8 {
        self.sensitivity
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Detection and tracking threshold handed to the tracker (`sensitivity / 10`).
    pub fn threshold(&self) -> f32 {
        f32::from(self.sensitivity) / 10.0
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            max_hands: defaults::MAX_HANDS,
            detection_threshold: self.threshold(),
            tracking_threshold: self.threshold(),
        }
    }
}

fn clamp_sensitivity(sensitivity: u8) -> u8 {
    let clamped = sensitivity.clamp(defaults::MIN_SENSITIVITY, defaults::MAX_SENSITIVITY);
    if clamped != sensitivity {
        tracing::warn!(requested = sensitivity, applied = clamped, "sensitivity out of range");
    }
    clamped
}

/// Outcome of [`SettingsController::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsUpdate {
    /// Values were identical to the stored ones.
    Unchanged,
    /// Stored; nothing is running so the next start picks them up.
    Applied,
    /// Stored; the running pipeline must stop and reinitialize its tracker.
    ReinitializeRequired,
}

/// Owns the current [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsController {
    settings: Settings,
}

impl SettingsController {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Stores new values and reports whether the pipeline must reinitialize.
    pub fn update(
        &mut self,
        sensitivity: u8,
        language: Language,
        state: PipelineState,
    ) -> SettingsUpdate {
        let next = Settings::new(sensitivity, language);
        if next == self.settings {
            return SettingsUpdate::Unchanged;
        }
        self.settings = next;
        tracing::info!(
            sensitivity = next.sensitivity,
            language = %next.language,
            "settings updated"
        );

        match state {
            PipelineState::Running | PipelineState::Initializing => {
                SettingsUpdate::ReinitializeRequired
            }
            PipelineState::Idle | PipelineState::Stopping => SettingsUpdate::Applied,
        }
    }
}
