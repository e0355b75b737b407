use crate::pipeline::types::{DetectionResult, GestureType};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Pluggable result output for the pipeline.
///
/// Called from the frame loop and from analysis tasks, so `deliver` must not
/// block. Each result is delivered at most once.
pub trait ResultSink: Send + Sync {
    fn deliver(&self, result: DetectionResult);

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

impl<F> ResultSink for F
where
    F: Fn(DetectionResult) + Send + Sync,
{
    fn deliver(&self, result: DetectionResult) {
        self(result)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}

/// Sink that keeps every result in memory. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct CollectorSink {
    collected: Arc<Mutex<Vec<DetectionResult>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Vec<DetectionResult> {
        self.collected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Sentence interpretations only.
    pub fn sentences(&self) -> Vec<DetectionResult> {
        self.results()
            .into_iter()
            .filter(|r| r.gesture_type == GestureType::Sentence)
            .collect()
    }

    /// Labels of per-frame results, in delivery order.
    pub fn signs(&self) -> Vec<String> {
        self.results()
            .into_iter()
            .filter(|r| r.gesture_type != GestureType::Sentence)
            .map(|r| r.sign)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.collected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for CollectorSink {
    fn deliver(&self, result: DetectionResult) {
        self.collected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(result);
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Sink that forwards results into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DetectionResult>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DetectionResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for ChannelSink {
    fn deliver(&self, result: DetectionResult) {
        if self.tx.send(result).is_err() {
            // Receiver dropped; nobody is listening anymore.
            tracing::trace!("result channel closed, dropping result");
        }
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}
