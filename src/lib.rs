//! signstream - sign-language gesture classification
//!
//! Turns per-frame hand landmarks into sign labels, buffers them into
//! sentences and interprets those with a language model or local patterns.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod analysis;
#[cfg(feature = "cli")]
pub mod app;
pub mod classifier;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod error;
pub mod hand;
pub mod lexicon;
#[cfg(feature = "cli")]
pub mod output;
pub mod pipeline;
pub mod replay;
pub mod sentence;
pub mod settings;

// Core traits (source → track → classify → sink)
pub use analysis::LanguageModel;
pub use pipeline::source::FrameSource;
pub use pipeline::sink::{ChannelSink, CollectorSink, ResultSink};
pub use pipeline::tracker::{HandTracker, TrackerFactory};

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig};
pub use pipeline::types::{DetectionResult, GestureType, PipelineState, Tier};

// Classification
pub use classifier::Classifier;
pub use hand::{HandSample, Landmark};
pub use sentence::{SentenceBuffer, SentenceTrigger};
pub use settings::{Language, Settings, SettingsController, SettingsUpdate};

// Error handling
pub use error::{Result, SignstreamError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
