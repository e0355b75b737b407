//! Hand-tracking collaborator.
//!
//! Trackers consume their [`TrackerConfig`] at construction only, so the
//! pipeline builds a fresh one through a [`TrackerFactory`] whenever detection
//! settings change.

use crate::error::{Result, SignstreamError};
use crate::hand::HandSample;
use crate::pipeline::types::Frame;
use crate::settings::TrackerConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Turns frames into per-hand landmark sets.
#[async_trait]
pub trait HandTracker: Send {
    /// Landmarks for every hand found in `frame` (possibly none).
    async fn track(&mut self, frame: &Frame) -> Result<Vec<HandSample>>;

    /// Releases tracker resources. Called once before the tracker is dropped.
    async fn close(&mut self);
}

/// Builds trackers for the current settings.
#[async_trait]
pub trait TrackerFactory: Send + Sync {
    async fn create(&self, config: &TrackerConfig) -> Result<Box<dyn HandTracker>>;
}

#[derive(Debug, Default)]
struct MockCounters {
    created: AtomicUsize,
    closed: AtomicUsize,
    tracked: AtomicUsize,
    configs: Mutex<Vec<TrackerConfig>>,
}

/// Mock tracker factory for testing.
///
/// Trackers replay a script of frames (indexed by frame sequence, wrapping
/// around) and share counters with the factory and its clones.
#[derive(Debug, Clone)]
pub struct MockTrackerFactory {
    script: Arc<Vec<Vec<HandSample>>>,
    fail_init: bool,
    fail_init_after: Option<usize>,
    fail_track: bool,
    counters: Arc<MockCounters>,
}

impl Default for MockTrackerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTrackerFactory {
    /// Factory whose trackers never see a hand.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Vec::new()),
            fail_init: false,
            fail_init_after: None,
            fail_track: false,
            counters: Arc::new(MockCounters::default()),
        }
    }

    /// Configure every frame to contain `hands`
    pub fn with_hands(self, hands: Vec<HandSample>) -> Self {
        self.with_script(vec![hands])
    }

    /// Configure per-frame hands, selected by `frame.sequence % script.len()`
    pub fn with_script(mut self, script: Vec<Vec<HandSample>>) -> Self {
        self.script = Arc::new(script);
        self
    }

    /// Configure `create` to fail
    pub fn with_init_failure(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Configure `create` to succeed `successes` times, then fail
    pub fn with_init_failure_after(mut self, successes: usize) -> Self {
        self.fail_init_after = Some(successes);
        self
    }

    /// Configure every `track` call to fail
    pub fn with_track_failure(mut self) -> Self {
        self.fail_track = true;
        self
    }

    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    pub fn tracked(&self) -> usize {
        self.counters.tracked.load(Ordering::SeqCst)
    }

    /// Configurations passed to `create`, oldest first.
    pub fn configs(&self) -> Vec<TrackerConfig> {
        self.counters
            .configs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl TrackerFactory for MockTrackerFactory {
    async fn create(&self, config: &TrackerConfig) -> Result<Box<dyn HandTracker>> {
        self.counters
            .configs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(*config);
        let exhausted = self
            .fail_init_after
            .is_some_and(|limit| self.created() >= limit);
        if self.fail_init || exhausted {
            return Err(SignstreamError::TrackerInit {
                message: "mock tracker refused to start".to_string(),
            });
        }
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockTracker {
            script: self.script.clone(),
            fail_track: self.fail_track,
            max_hands: config.max_hands,
            counters: self.counters.clone(),
        }))
    }
}

struct MockTracker {
    script: Arc<Vec<Vec<HandSample>>>,
    fail_track: bool,
    max_hands: usize,
    counters: Arc<MockCounters>,
}

#[async_trait]
impl HandTracker for MockTracker {
    async fn track(&mut self, frame: &Frame) -> Result<Vec<HandSample>> {
        self.counters.tracked.fetch_add(1, Ordering::SeqCst);
        if self.fail_track {
            return Err(SignstreamError::Tracking {
                message: format!("mock tracker failed on frame {}", frame.sequence),
            });
        }
        if self.script.is_empty() {
            return Ok(Vec::new());
        }
        let slot = (frame.sequence % self.script.len() as u64) as usize;
        Ok(self.script[slot]
            .iter()
            .take(self.max_hands)
            .cloned()
            .collect())
    }

    async fn close(&mut self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}
