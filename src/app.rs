//! Command implementations behind the `signstream` binary.
//!
//! Wires configuration, recordings, the classifier and the pipeline together:
//! landmarks → classify → print.

use crate::analysis;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::output::{OutputStyle, StdoutSink};
use crate::pipeline::orchestrator::{Pipeline, PipelineConfig};
use crate::pipeline::sink::ResultSink;
use crate::pipeline::LoopExit;
use crate::replay::{self, Recording};
use crate::settings::Language;
use anyhow::{Context, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Command-line overrides for `signstream replay`.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub file: PathBuf,
    pub fps: Option<u32>,
    pub language: Option<Language>,
    pub sensitivity: Option<u8>,
    pub interval: Option<Duration>,
    pub seed: Option<u64>,
}

impl ReplayOptions {
    /// Applies the overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(fps) = self.fps {
            config.tracking.frame_interval_ms = 1000 / u64::from(fps.max(1));
        }
        if let Some(language) = self.language {
            config.detection.language = language;
        }
        if let Some(sensitivity) = self.sensitivity {
            config.detection.sensitivity = sensitivity;
        }
        if let Some(interval) = self.interval {
            config.analysis.min_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(seed) = self.seed {
            config.detection.seed = Some(seed);
        }
    }
}

/// Classify one frame read from `file` and print the result.
pub fn run_classify(
    config: &Config,
    file: &Path,
    language: Option<Language>,
    seed: Option<u64>,
    style: OutputStyle,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let hands = replay::parse_frame(&text)
        .with_context(|| format!("Failed to parse hand landmarks from {}", file.display()))?;

    let language = language.unwrap_or(config.detection.language);
    let mut classifier = match seed.or(config.detection.seed) {
        Some(seed) => Classifier::with_seed(seed, language),
        None => Classifier::new(language),
    };

    let Some(result) = classifier.classify(&hands) else {
        bail!(
            "No classifiable hand in {} (expected 21 landmarks per hand)",
            file.display()
        );
    };

    StdoutSink::new(OutputStyle {
        sentences_only: false,
        ..style
    })
    .deliver(result);
    Ok(())
}

/// Replay a recorded landmark stream through the full pipeline.
///
/// Runs until the recording ends or Ctrl-C, then prints the buffered labels.
pub async fn run_replay(
    mut config: Config,
    options: ReplayOptions,
    style: OutputStyle,
) -> anyhow::Result<()> {
    options.apply(&mut config);
    config.validate()?;

    let recording = Recording::load(&options.file)
        .with_context(|| format!("Failed to load recording {}", options.file.display()))?;
    if recording.is_empty() {
        bail!("Recording {} contains no frames", options.file.display());
    }
    tracing::info!(
        frames = recording.len(),
        language = %config.detection.language,
        sensitivity = config.detection.sensitivity,
        "replaying recording"
    );

    let model = analysis::build_model(&config.analysis);
    let mut pipeline = Pipeline::new(
        PipelineConfig::from_config(&config),
        Arc::new(recording.tracker_factory()),
        model,
    );
    let sink: Arc<dyn ResultSink> = Arc::new(StdoutSink::new(style));
    pipeline.start(Box::new(recording.source()), sink).await?;

    let interrupted = tokio::select! {
        exit = pipeline.wait() => {
            if exit == Some(LoopExit::SourceFailed) {
                tracing::warn!("replay ended early after repeated source failures");
            }
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        pipeline.stop().await;
    }

    let labels = pipeline.sentence();
    if !style.json && !labels.is_empty() {
        eprintln!("Buffered signs: {}", labels.join(", "));
    }
    Ok(())
}

/// Print the effective configuration as TOML (API key redacted).
pub fn show_config(config: &Config) -> anyhow::Result<()> {
    print!("{}", config.to_toml_redacted()?);
    Ok(())
}
