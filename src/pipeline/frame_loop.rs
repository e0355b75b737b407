//! The per-frame task: source → tracker → classifier → buffer/sink.

use crate::analysis::SemanticAnalyzer;
use crate::classifier::Classifier;
use crate::clock::Clock;
use crate::defaults;
use crate::pipeline::error::{ErrorReporter, StationError};
use crate::pipeline::sink::ResultSink;
use crate::pipeline::source::FrameSource;
use crate::pipeline::tracker::HandTracker;
use crate::pipeline::types::{
    DetectionResult, Frame, GestureType, PipelineEvent, SourceState, Tier,
};
use crate::sentence::{SentenceBuffer, SentenceTrigger};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Per-frame tuning shared by every loop a pipeline starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LoopSettings {
    pub confidence_gate: f32,
    pub validation_frames: u32,
    pub frame_interval: Duration,
}

/// Collaborators that outlive a single loop.
#[derive(Clone)]
pub(crate) struct LoopContext {
    pub sink: Arc<dyn ResultSink>,
    pub buffer: Arc<Mutex<SentenceBuffer>>,
    pub analyzer: Option<Arc<SemanticAnalyzer>>,
    pub clock: Arc<dyn Clock>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub events: Option<crossbeam_channel::Sender<PipelineEvent>>,
    pub settings: LoopSettings,
}

/// Why a loop finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Stopped by the owning pipeline.
    Cancelled,
    /// The source reported `Ended`.
    SourceEnded,
    /// The source failed too many times in a row.
    SourceFailed,
}

/// State handed back to the pipeline so a reinitialize can resume.
pub(crate) struct LoopOutcome {
    pub source: Box<dyn FrameSource>,
    pub classifier: Classifier,
    pub trigger: SentenceTrigger,
    pub exit: LoopExit,
}

/// Sleeps one frame interval; true when shutdown was requested meanwhile.
async fn idle(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(interval) => false,
        changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
    }
}

/// Publishes a pipeline event without blocking.
pub(crate) fn emit(events: &Option<crossbeam_channel::Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events
        && tx.try_send(event).is_err()
    {
        // Channel full or closed - events are best effort
    }
}

pub(crate) struct FrameLoop {
    source: Box<dyn FrameSource>,
    tracker: Box<dyn HandTracker>,
    classifier: Classifier,
    trigger: SentenceTrigger,
    ctx: LoopContext,
    analysis: Option<JoinHandle<()>>,
    skip_reported: bool,
    streak: Option<(String, u32)>,
}

impl FrameLoop {
    pub(crate) fn new(
        source: Box<dyn FrameSource>,
        tracker: Box<dyn HandTracker>,
        classifier: Classifier,
        trigger: SentenceTrigger,
        ctx: LoopContext,
    ) -> Self {
        Self {
            source,
            tracker,
            classifier,
            trigger,
            ctx,
            analysis: None,
            skip_reported: false,
            streak: None,
        }
    }

    /// Runs until the source ends, fails, or `shutdown` flips to true.
    ///
    /// On cancellation the in-flight analysis is aborted; otherwise it is
    /// allowed to deliver first. The tracker is closed before returning.
    pub(crate) async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> LoopOutcome {
        let mut consecutive_errors: u32 = 0;
        let interval = self.ctx.settings.frame_interval;
        tracing::debug!(source = self.source.name(), "frame loop started");

        let exit = loop {
            if *shutdown.borrow() {
                break LoopExit::Cancelled;
            }

            match self.source.state() {
                SourceState::Ended => break LoopExit::SourceEnded,
                SourceState::Paused => {
                    if idle(interval, &mut shutdown).await {
                        break LoopExit::Cancelled;
                    }
                    continue;
                }
                SourceState::Ready => {}
            }

            match self.source.read_frame() {
                Ok(Some(frame)) => {
                    consecutive_errors = 0;
                    self.process(frame).await;
                }
                Ok(None) => {}
                Err(e) => {
                    consecutive_errors += 1;
                    if consecutive_errors >= defaults::MAX_CONSECUTIVE_SOURCE_ERRORS {
                        self.ctx.reporter.report(
                            "source",
                            &StationError::Fatal(format!(
                                "frame source failed {consecutive_errors} times in a row: {e}"
                            )),
                        );
                        break LoopExit::SourceFailed;
                    }
                    self.ctx
                        .reporter
                        .report("source", &StationError::Recoverable(e.to_string()));
                }
            }

            if idle(interval, &mut shutdown).await {
                break LoopExit::Cancelled;
            }
        };

        if let Some(mut handle) = self.analysis.take() {
            if exit == LoopExit::Cancelled {
                handle.abort();
            } else {
                let finished = tokio::select! {
                    _ = &mut handle => true,
                    _ = shutdown.changed() => false,
                };
                if !finished {
                    handle.abort();
                }
            }
        }

        self.tracker.close().await;
        tracing::debug!(?exit, "frame loop finished");

        LoopOutcome {
            source: self.source,
            classifier: self.classifier,
            trigger: self.trigger,
            exit,
        }
    }

    async fn process(&mut self, frame: Frame) {
        let hands = match self.tracker.track(&frame).await {
            Ok(hands) => hands,
            Err(e) => {
                self.ctx
                    .reporter
                    .report("tracker", &StationError::Recoverable(e.to_string()));
                return;
            }
        };

        let Some(mut result) = self.classifier.classify(&hands) else {
            self.streak = None;
            return;
        };

        if result.confidence > self.ctx.settings.confidence_gate {
            // Fallback guesses repeat by chance; they never count as steady.
            if result.tier == Some(Tier::Fallback) {
                self.streak = None;
            } else if self.observe(&result.sign) {
                result.gesture_type = GestureType::Validated;
            }
            self.buffer_label(&result);
            self.maybe_analyze();
        } else {
            self.streak = None;
        }

        tracing::debug!(
            frame = frame.sequence,
            sign = %result.sign,
            confidence = result.confidence,
            "frame classified"
        );
        self.ctx.sink.deliver(result);
    }

    /// Tracks consecutive identical labels; true once the run is long enough.
    fn observe(&mut self, sign: &str) -> bool {
        let (label, count) = match self.streak.take() {
            Some((label, count)) if label == sign => (label, count.saturating_add(1)),
            _ => (sign.to_string(), 1),
        };
        self.streak = Some((label, count));
        count >= self.ctx.settings.validation_frames
    }

    fn buffer_label(&self, result: &DetectionResult) {
        let mut buffer = self.ctx.buffer.lock().unwrap_or_else(|e| e.into_inner());
        if buffer.push(result.sign.as_str()) {
            tracing::trace!(sign = %result.sign, len = buffer.len(), "label buffered");
        }
    }

    fn maybe_analyze(&mut self) {
        let Some(analyzer) = self.ctx.analyzer.clone() else {
            return;
        };

        let now = self.ctx.clock.now();
        let labels = {
            let buffer = self.ctx.buffer.lock().unwrap_or_else(|e| e.into_inner());
            if !self.trigger.is_due(&buffer, now) {
                return;
            }
            buffer.labels()
        };

        if self.analysis.as_ref().is_some_and(|h| !h.is_finished()) {
            if !self.skip_reported {
                tracing::debug!("analysis still in flight, skipping trigger");
                emit(&self.ctx.events, PipelineEvent::AnalysisSkipped);
                self.skip_reported = true;
            }
            return;
        }

        self.trigger.mark(now);
        self.skip_reported = false;
        emit(
            &self.ctx.events,
            PipelineEvent::AnalysisDispatched {
                labels: labels.len(),
            },
        );

        let language = self.classifier.language();
        let sink = self.ctx.sink.clone();
        self.analysis = Some(tokio::spawn(async move {
            if let Some(result) = analyzer.analyze(&labels, language).await {
                tracing::info!(sentence = %result.sign, "sentence interpreted");
                sink.deliver(result);
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::hand::{Finger, FingerForm, HandBuilder, HandSample, ThumbForm};
    use crate::pipeline::error::MemoryReporter;
    use crate::pipeline::sink::CollectorSink;
    use crate::pipeline::source::MockFrameSource;
    use crate::pipeline::tracker::{MockTrackerFactory, TrackerFactory};
    use crate::settings::{Language, TrackerConfig};

    struct Harness {
        sink: CollectorSink,
        buffer: Arc<Mutex<SentenceBuffer>>,
        reporter: Arc<MemoryReporter>,
        ctx: LoopContext,
    }

    fn harness(analyzer: Option<SemanticAnalyzer>) -> Harness {
        let sink = CollectorSink::new();
        let buffer = Arc::new(Mutex::new(SentenceBuffer::default()));
        let reporter = Arc::new(MemoryReporter::new());
        let ctx = LoopContext {
            sink: Arc::new(sink.clone()),
            buffer: buffer.clone(),
            analyzer: analyzer.map(Arc::new),
            clock: Arc::new(TokioClock),
            reporter: reporter.clone(),
            events: None,
            settings: LoopSettings {
                confidence_gate: defaults::CONFIDENCE_GATE,
                validation_frames: defaults::VALIDATION_FRAMES,
                frame_interval: Duration::from_millis(16),
            },
        };
        Harness {
            sink,
            buffer,
            reporter,
            ctx,
        }
    }

    async fn run_loop(
        source: MockFrameSource,
        factory: &MockTrackerFactory,
        ctx: LoopContext,
    ) -> LoopOutcome {
        let tracker = factory.create(&TrackerConfig::default()).await.unwrap();
        let frame_loop = FrameLoop::new(
            Box::new(source),
            tracker,
            Classifier::with_seed(7, Language::Asl),
            SentenceTrigger::default(),
            ctx,
        );
        let (_tx, rx) = watch::channel(false);
        frame_loop.run(rx).await
    }

    fn open_hand() -> HandSample {
        HandBuilder::open_hand().build()
    }

    #[tokio::test(start_paused = true)]
    async fn steady_label_becomes_validated() {
        let h = harness(None);
        let factory = MockTrackerFactory::new().with_hands(vec![open_hand()]);
        let outcome = run_loop(MockFrameSource::new().with_frames(4), &factory, h.ctx).await;

        assert_eq!(outcome.exit, LoopExit::SourceEnded);
        let types: Vec<_> = h.sink.results().iter().map(|r| r.gesture_type).collect();
        assert_eq!(
            types,
            vec![
                GestureType::Static,
                GestureType::Static,
                GestureType::Validated,
                GestureType::Validated
            ]
        );
        let buffer = h.buffer.lock().unwrap();
        assert_eq!(buffer.labels(), vec!["Open Hand".to_string()]);
        assert_eq!(factory.closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_guesses_are_never_validated() {
        let middle_only = HandBuilder::fist()
            .finger(Finger::Middle, FingerForm::Extended)
            .build();
        for seed in 0..20 {
            let h = harness(None);
            let factory = MockTrackerFactory::new().with_hands(vec![middle_only.clone()]);
            let tracker = factory.create(&TrackerConfig::default()).await.unwrap();
            let frame_loop = FrameLoop::new(
                Box::new(MockFrameSource::new().with_frames(6)),
                tracker,
                Classifier::with_seed(seed, Language::Asl),
                SentenceTrigger::default(),
                h.ctx,
            );
            let (_tx, rx) = watch::channel(false);
            frame_loop.run(rx).await;

            let results = h.sink.results();
            assert_eq!(results.len(), 6);
            assert!(results.iter().all(|r| r.is_low_trust()));
            assert!(
                results
                    .iter()
                    .all(|r| r.gesture_type == GestureType::Static),
                "seed {seed} produced a validated fallback guess"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn gate_is_exclusive() {
        let mut h = harness(None);
        h.ctx.settings.confidence_gate = crate::classifier::STATIC_CONFIDENCE;
        let factory = MockTrackerFactory::new().with_hands(vec![open_hand()]);
        run_loop(MockFrameSource::new().with_frames(2), &factory, h.ctx).await;

        assert_eq!(h.sink.len(), 2);
        assert!(h.buffer.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_frames_deliver_nothing() {
        let h = harness(None);
        let factory = MockTrackerFactory::new();
        run_loop(MockFrameSource::new().with_frames(3), &factory, h.ctx).await;
        assert!(h.sink.is_empty());
        assert_eq!(factory.tracked(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_errors_are_recoverable() {
        let h = harness(None);
        let factory = MockTrackerFactory::new().with_track_failure();
        let outcome = run_loop(MockFrameSource::new().with_frames(2), &factory, h.ctx).await;

        assert_eq!(outcome.exit, LoopExit::SourceEnded);
        let errors = h.reporter.errors();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|(stage, e)| stage == "tracker" && !e.is_fatal()));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_source_failures_end_the_loop() {
        let h = harness(None);
        let factory = MockTrackerFactory::new();
        let outcome = run_loop(MockFrameSource::new().with_read_failure(), &factory, h.ctx).await;

        assert_eq!(outcome.exit, LoopExit::SourceFailed);
        assert_eq!(h.reporter.errors().len(), 10);
        assert_eq!(h.reporter.fatal_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn isolated_source_failures_are_tolerated() {
        let h = harness(None);
        let factory = MockTrackerFactory::new().with_hands(vec![open_hand()]);
        let source = MockFrameSource::new().with_read_failures(3).with_frames(1);
        let outcome = run_loop(source, &factory, h.ctx).await;

        assert_eq!(outcome.exit, LoopExit::SourceEnded);
        assert_eq!(h.reporter.fatal_count(), 0);
        assert_eq!(h.sink.signs(), vec!["Open Hand".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn two_labels_dispatch_local_analysis() {
        let mut h = harness(Some(SemanticAnalyzer::local_only()));
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        h.ctx.events = Some(events_tx);

        let hello = HandBuilder::fist()
            .fingers(&Finger::FOUR, FingerForm::Horizontal)
            .thumb(ThumbForm::Extended)
            .offset(0.0, -0.5)
            .build();
        let how_are_you = HandBuilder::fist()
            .fingers(&[Finger::Index, Finger::Middle], FingerForm::Hooked)
            .build();
        let factory = MockTrackerFactory::new().with_script(vec![
            vec![hello.clone()],
            vec![hello],
            vec![how_are_you.clone()],
            vec![how_are_you],
        ]);
        run_loop(MockFrameSource::new().with_frames(4), &factory, h.ctx).await;

        assert_eq!(
            h.buffer.lock().unwrap().labels(),
            vec!["Hello".to_string(), "How are you?".to_string()]
        );
        assert_eq!(
            events_rx.try_recv().unwrap(),
            PipelineEvent::AnalysisDispatched { labels: 2 }
        );
        let sentences = h.sink.sentences();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].sign, "Hello, how are you?");
    }

    #[tokio::test(start_paused = true)]
    async fn analysis_disabled_never_dispatches() {
        let h = harness(None);
        let open = open_hand();
        let fist = HandBuilder::fist().build();
        let factory = MockTrackerFactory::new().with_script(vec![vec![open], vec![fist]]);
        run_loop(MockFrameSource::new().with_frames(6), &factory, h.ctx).await;

        assert_eq!(h.buffer.lock().unwrap().len(), 6);
        assert!(h.sink.sentences().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_hands_are_skipped() {
        let h = harness(None);
        let short = HandSample::from_points(&[(0.5, 0.5, 0.0); 5]);
        let factory = MockTrackerFactory::new().with_hands(vec![short]);
        run_loop(MockFrameSource::new().with_frames(2), &factory, h.ctx).await;
        assert!(h.sink.is_empty());
        assert!(h.buffer.lock().unwrap().is_empty());
    }
}
