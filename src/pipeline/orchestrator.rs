//! Gesture pipeline owned by a single caller.

use crate::analysis::{AnalyzerConfig, LanguageModel, SemanticAnalyzer};
use crate::classifier::Classifier;
use crate::clock::{Clock, TokioClock};
use crate::config::Config;
use crate::defaults;
use crate::error::{Result, SignstreamError};
use crate::pipeline::error::{ErrorReporter, LogReporter, StationError};
use crate::pipeline::frame_loop::{
    FrameLoop, LoopContext, LoopExit, LoopOutcome, LoopSettings, emit,
};
use crate::pipeline::sink::ResultSink;
use crate::pipeline::source::FrameSource;
use crate::pipeline::tracker::{HandTracker, TrackerFactory};
use crate::pipeline::types::{PipelineEvent, PipelineState};
use crate::sentence::{SentenceBuffer, SentenceTrigger};
use crate::settings::{Language, Settings, SettingsController, SettingsUpdate, TrackerConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Initial sensitivity and language
    pub settings: Settings,
    /// Hands requested from the tracker
    pub max_hands: usize,
    /// Labels enter the sentence buffer only when their confidence is strictly above this
    pub confidence_gate: f32,
    /// Consecutive identical frames before a result is tagged validated
    pub validation_frames: u32,
    /// Pause between frame reads
    pub frame_interval: Duration,
    /// Sentence buffer capacity
    pub sentence_capacity: usize,
    /// Minimum time between analysis dispatches
    pub analysis_interval: Duration,
    /// Run semantic analysis at all
    pub analysis_enabled: bool,
    /// Language model request parameters
    pub analyzer: AnalyzerConfig,
    /// Fixed fallback-tier seed
    pub seed: Option<u64>,
    /// Optional event sender for lifecycle notifications (crossbeam, non-blocking)
    pub event_tx: Option<crossbeam_channel::Sender<PipelineEvent>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            max_hands: defaults::MAX_HANDS,
            confidence_gate: defaults::CONFIDENCE_GATE,
            validation_frames: defaults::VALIDATION_FRAMES,
            frame_interval: Duration::from_millis(defaults::FRAME_INTERVAL_MS),
            sentence_capacity: defaults::SENTENCE_CAPACITY,
            analysis_interval: Duration::from_millis(defaults::ANALYSIS_INTERVAL_MS),
            analysis_enabled: true,
            analyzer: AnalyzerConfig::default(),
            seed: None,
            event_tx: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            settings: config.detection.settings(),
            max_hands: config.tracking.max_hands,
            confidence_gate: config.detection.confidence_gate,
            validation_frames: config.detection.validation_frames,
            frame_interval: Duration::from_millis(config.tracking.frame_interval_ms),
            sentence_capacity: defaults::SENTENCE_CAPACITY,
            analysis_interval: Duration::from_millis(config.analysis.min_interval_ms),
            analysis_enabled: config.analysis.enabled,
            analyzer: AnalyzerConfig::from(&config.analysis),
            seed: config.detection.seed,
            event_tx: None,
        }
    }

    fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            confidence_gate: self.confidence_gate,
            validation_frames: self.validation_frames.max(1),
            frame_interval: self.frame_interval,
        }
    }
}

struct RunningLoop {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<LoopOutcome>,
}

/// Streaming gesture pipeline: FrameSource → HandTracker → Classifier → ResultSink.
///
/// Labels that pass the confidence gate are buffered and periodically sent
/// for semantic analysis in a separate task. Changing settings while running
/// restarts the frame loop with a freshly built tracker.
pub struct Pipeline {
    config: PipelineConfig,
    controller: SettingsController,
    factory: Arc<dyn TrackerFactory>,
    analyzer: Option<Arc<SemanticAnalyzer>>,
    buffer: Arc<Mutex<SentenceBuffer>>,
    state: PipelineState,
    sink: Option<Arc<dyn ResultSink>>,
    running: Option<RunningLoop>,
    error_reporter: Arc<dyn ErrorReporter>,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    /// Creates an idle pipeline.
    ///
    /// `model` is only consulted when analysis is enabled; without one,
    /// sentences come from local pattern analysis.
    pub fn new(
        config: PipelineConfig,
        factory: Arc<dyn TrackerFactory>,
        model: Option<Arc<dyn LanguageModel>>,
    ) -> Self {
        let analyzer = config
            .analysis_enabled
            .then(|| Arc::new(SemanticAnalyzer::new(model, config.analyzer)));
        Self {
            controller: SettingsController::new(config.settings),
            buffer: Arc::new(Mutex::new(SentenceBuffer::new(config.sentence_capacity))),
            config,
            factory,
            analyzer,
            state: PipelineState::Idle,
            sink: None,
            running: None,
            error_reporter: Arc::new(LogReporter),
            clock: Arc::new(TokioClock),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Sets a custom clock for the sentence trigger.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn settings(&self) -> Settings {
        self.controller.settings()
    }

    /// Snapshot of the buffered labels, oldest first.
    pub fn sentence(&self) -> Vec<String> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .labels()
    }

    pub fn clear_sentence(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        tracing::debug!("sentence buffer cleared");
    }

    /// Starts processing frames from `source`.
    ///
    /// Fails with `AlreadyRunning` unless idle, and with `TrackerInit` when the
    /// tracker cannot be built; the pipeline is idle again in that case.
    pub async fn start(
        &mut self,
        source: Box<dyn FrameSource>,
        sink: Arc<dyn ResultSink>,
    ) -> Result<()> {
        if self.state != PipelineState::Idle {
            return Err(SignstreamError::AlreadyRunning);
        }

        self.set_state(PipelineState::Initializing);
        let tracker = match self.create_tracker().await {
            Ok(tracker) => tracker,
            Err(e) => {
                self.set_state(PipelineState::Idle);
                return Err(e);
            }
        };

        let settings = self.controller.settings();
        let classifier = match self.config.seed {
            Some(seed) => Classifier::with_seed(seed, settings.language()),
            None => Classifier::new(settings.language()),
        };
        let trigger = SentenceTrigger::new(self.config.analysis_interval);

        self.sink = Some(sink);
        self.spawn_loop(source, tracker, classifier, trigger)?;
        self.set_state(PipelineState::Running);
        tracing::info!(
            sensitivity = settings.sensitivity(),
            language = %settings.language(),
            "pipeline started"
        );
        Ok(())
    }

    /// Stops the frame loop, cancels any in-flight analysis and closes the tracker.
    ///
    /// Calling it when already idle is a no-op.
    pub async fn stop(&mut self) {
        if self.state == PipelineState::Idle && self.running.is_none() {
            return;
        }
        self.set_state(PipelineState::Stopping);
        // Outcome dropped: the source and tracker are released here.
        let _outcome = self.halt_loop().await;
        self.sink = None;
        self.set_state(PipelineState::Idle);
        tracing::info!("pipeline stopped");
    }

    /// Waits for the frame loop to finish on its own (source ended or failed).
    ///
    /// Returns `None` immediately when nothing is running. Safe to cancel:
    /// dropping the future leaves the pipeline running.
    pub async fn wait(&mut self) -> Option<LoopExit> {
        let running = self.running.as_mut()?;
        let joined = (&mut running.handle).await;
        self.running = None;

        let exit = match joined {
            Ok(outcome) => outcome.exit,
            Err(e) => {
                self.error_reporter
                    .report("pipeline", &StationError::Fatal(format!("frame loop panicked: {e}")));
                LoopExit::SourceFailed
            }
        };

        self.set_state(PipelineState::Stopping);
        self.sink = None;
        self.set_state(PipelineState::Idle);
        tracing::info!(?exit, "pipeline finished");
        Some(exit)
    }

    /// Stores new settings, reinitializing the tracker when running.
    ///
    /// While running the pipeline passes through `Stopping` and
    /// `Initializing` before it is `Running` again. If the new tracker cannot
    /// be built the pipeline ends up idle and `TrackerInit` is returned.
    pub async fn update_settings(
        &mut self,
        sensitivity: u8,
        language: Language,
    ) -> Result<SettingsUpdate> {
        let update = self.controller.update(sensitivity, language, self.state);
        if update != SettingsUpdate::ReinitializeRequired {
            return Ok(update);
        }

        self.set_state(PipelineState::Stopping);
        let Some(outcome) = self.halt_loop().await else {
            self.sink = None;
            self.set_state(PipelineState::Idle);
            return Ok(SettingsUpdate::Applied);
        };

        self.set_state(PipelineState::Initializing);
        let tracker = match self.create_tracker().await {
            Ok(tracker) => tracker,
            Err(e) => {
                self.sink = None;
                self.set_state(PipelineState::Idle);
                return Err(e);
            }
        };

        let LoopOutcome {
            source,
            mut classifier,
            trigger,
            ..
        } = outcome;
        classifier.set_language(self.controller.settings().language());
        self.spawn_loop(source, tracker, classifier, trigger)?;
        self.set_state(PipelineState::Running);
        tracing::info!("pipeline reinitialized with new settings");
        Ok(update)
    }

    fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            max_hands: self.config.max_hands,
            ..self.controller.settings().tracker_config()
        }
    }

    async fn create_tracker(&self) -> Result<Box<dyn HandTracker>> {
        let config = self.tracker_config();
        self.factory.create(&config).await.map_err(|e| match e {
            SignstreamError::TrackerInit { .. } => e,
            other => SignstreamError::TrackerInit {
                message: other.to_string(),
            },
        })
    }

    fn spawn_loop(
        &mut self,
        source: Box<dyn FrameSource>,
        tracker: Box<dyn HandTracker>,
        classifier: Classifier,
        trigger: SentenceTrigger,
    ) -> Result<()> {
        let sink = self
            .sink
            .clone()
            .ok_or_else(|| SignstreamError::Other("pipeline has no result sink".to_string()))?;
        let ctx = LoopContext {
            sink,
            buffer: self.buffer.clone(),
            analyzer: self.analyzer.clone(),
            clock: self.clock.clone(),
            reporter: self.error_reporter.clone(),
            events: self.config.event_tx.clone(),
            settings: self.config.loop_settings(),
        };
        let (shutdown, shutdown_rx) = watch::channel(false);
        let frame_loop = FrameLoop::new(source, tracker, classifier, trigger, ctx);
        let handle = tokio::spawn(frame_loop.run(shutdown_rx));
        self.running = Some(RunningLoop { shutdown, handle });
        Ok(())
    }

    /// Signals the loop to stop and waits for it; the loop closes its tracker.
    async fn halt_loop(&mut self) -> Option<LoopOutcome> {
        let running = self.running.take()?;
        if running.shutdown.send(true).is_err() {
            // Loop already finished and dropped its receiver
        }
        match running.handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.error_reporter
                    .report("pipeline", &StationError::Fatal(format!("frame loop panicked: {e}")));
                None
            }
        }
    }

    fn set_state(&mut self, to: PipelineState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        tracing::debug!(%from, %to, "pipeline state changed");
        emit(&self.config.event_tx, PipelineEvent::StateChanged { from, to });
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if let Some(running) = &self.running
            && running.shutdown.send(true).is_err()
        {
            // Loop already gone
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandBuilder;
    use crate::pipeline::sink::CollectorSink;
    use crate::pipeline::source::MockFrameSource;
    use crate::pipeline::tracker::MockTrackerFactory;

    fn pipeline(factory: &MockTrackerFactory) -> Pipeline {
        let config = PipelineConfig {
            seed: Some(1),
            ..PipelineConfig::default()
        };
        Pipeline::new(config, Arc::new(factory.clone()), None)
    }

    fn collector() -> (CollectorSink, Arc<dyn ResultSink>) {
        let sink = CollectorSink::new();
        let shared: Arc<dyn ResultSink> = Arc::new(sink.clone());
        (sink, shared)
    }

    #[tokio::test(start_paused = true)]
    async fn start_runs_and_stop_returns_to_idle() {
        let factory = MockTrackerFactory::new().with_hands(vec![HandBuilder::open_hand().build()]);
        let mut pipeline = pipeline(&factory);
        let (sink, shared) = collector();

        pipeline
            .start(Box::new(MockFrameSource::new()), shared)
            .await
            .unwrap();
        assert_eq!(pipeline.state(), PipelineState::Running);

        tokio::time::sleep(Duration::from_millis(100)).await;
        pipeline.stop().await;

        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(!sink.is_empty());
        assert_eq!(factory.created(), 1);
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_twice_is_harmless() {
        let factory = MockTrackerFactory::new();
        let mut pipeline = pipeline(&factory);
        pipeline.stop().await;

        let (_sink, shared) = collector();
        pipeline
            .start(Box::new(MockFrameSource::new()), shared)
            .await
            .unwrap();
        pipeline.stop().await;
        pipeline.stop().await;
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_rejected() {
        let factory = MockTrackerFactory::new();
        let mut pipeline = pipeline(&factory);
        let (_sink, shared) = collector();
        pipeline
            .start(Box::new(MockFrameSource::new()), shared.clone())
            .await
            .unwrap();

        let err = pipeline
            .start(Box::new(MockFrameSource::new()), shared)
            .await
            .unwrap_err();
        assert!(matches!(err, SignstreamError::AlreadyRunning));
        pipeline.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_init_failure_leaves_pipeline_idle() {
        let factory = MockTrackerFactory::new().with_init_failure();
        let mut pipeline = pipeline(&factory);
        let (_sink, shared) = collector();

        let err = pipeline
            .start(Box::new(MockFrameSource::new()), shared)
            .await
            .unwrap_err();
        assert!(matches!(err, SignstreamError::TrackerInit { .. }));
        assert!(err.is_fatal());
        assert_eq!(pipeline.state(), PipelineState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_change_while_running_reinitializes() {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let factory = MockTrackerFactory::new();
        let config = PipelineConfig {
            event_tx: Some(events_tx),
            ..PipelineConfig::default()
        };
        let mut pipeline = Pipeline::new(config, Arc::new(factory.clone()), None);
        let (_sink, shared) = collector();
        pipeline
            .start(Box::new(MockFrameSource::new()), shared)
            .await
            .unwrap();

        let update = pipeline.update_settings(8, Language::Bsl).await.unwrap();
        assert_eq!(update, SettingsUpdate::ReinitializeRequired);
        assert_eq!(pipeline.state(), PipelineState::Running);

        let states: Vec<_> = events_rx
            .try_iter()
            .filter_map(|event| match event {
                PipelineEvent::StateChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            states,
            vec![
                PipelineState::Initializing,
                PipelineState::Running,
                PipelineState::Stopping,
                PipelineState::Initializing,
                PipelineState::Running,
            ]
        );

        assert_eq!(factory.created(), 2);
        assert_eq!(factory.closed(), 1);
        let configs = factory.configs();
        assert!((configs[1].detection_threshold - 0.8).abs() < f32::EPSILON);
        pipeline.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn settings_change_while_idle_applies() {
        let factory = MockTrackerFactory::new();
        let mut pipeline = pipeline(&factory);
        assert_eq!(
            pipeline.update_settings(5, Language::Asl).await.unwrap(),
            SettingsUpdate::Unchanged
        );
        assert_eq!(
            pipeline.update_settings(3, Language::Ksl).await.unwrap(),
            SettingsUpdate::Applied
        );
        assert_eq!(pipeline.settings().language(), Language::Ksl);
        assert_eq!(factory.created(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_when_source_ends() {
        let factory = MockTrackerFactory::new().with_hands(vec![HandBuilder::open_hand().build()]);
        let mut pipeline = pipeline(&factory);
        let (sink, shared) = collector();
        pipeline
            .start(Box::new(MockFrameSource::new().with_frames(3)), shared)
            .await
            .unwrap();

        assert_eq!(pipeline.wait().await, Some(LoopExit::SourceEnded));
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert_eq!(sink.signs().len(), 3);
        assert_eq!(pipeline.sentence(), vec!["Open Hand".to_string()]);
        assert_eq!(pipeline.wait().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_sentence_empties_buffer() {
        let factory = MockTrackerFactory::new().with_hands(vec![HandBuilder::fist().build()]);
        let mut pipeline = pipeline(&factory);
        let (_sink, shared) = collector();
        pipeline
            .start(Box::new(MockFrameSource::new().with_frames(1)), shared)
            .await
            .unwrap();
        pipeline.wait().await;

        assert_eq!(pipeline.sentence(), vec!["Fist".to_string()]);
        pipeline.clear_sentence();
        assert!(pipeline.sentence().is_empty());
    }

    #[test]
    fn config_maps_onto_pipeline() {
        let mut config = Config::default();
        config.detection.sensitivity = 9;
        config.detection.seed = Some(5);
        config.tracking.frame_interval_ms = 40;
        config.analysis.enabled = false;

        let pipeline_config = PipelineConfig::from_config(&config);
        assert_eq!(pipeline_config.settings.sensitivity(), 9);
        assert_eq!(pipeline_config.seed, Some(5));
        assert_eq!(pipeline_config.frame_interval, Duration::from_millis(40));
        assert!(!pipeline_config.analysis_enabled);
    }
}
