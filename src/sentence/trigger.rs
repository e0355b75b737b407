use crate::defaults;
use crate::sentence::SentenceBuffer;
use std::time::{Duration, Instant};

/// Rate limiter that decides when buffered labels are sent for analysis.
#[derive(Debug, Clone)]
pub struct SentenceTrigger {
    min_interval: Duration,
    last_analysis: Option<Instant>,
}

impl Default for SentenceTrigger {
    fn default() -> Self {
        Self::new(Duration::from_millis(defaults::ANALYSIS_INTERVAL_MS))
    }
}

impl SentenceTrigger {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_analysis: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_analysis(&self) -> Option<Instant> {
        self.last_analysis
    }

    /// True when `buffer` is due for analysis at `now`.
    pub fn is_due(&self, buffer: &SentenceBuffer, now: Instant) -> bool {
        buffer.should_analyze(now, self.last_analysis, self.min_interval)
    }

    /// Records that an analysis was started at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_analysis = Some(now);
    }

    /// Checks and marks in one step; returns whether an analysis should start.
    pub fn fire(&mut self, buffer: &SentenceBuffer, now: Instant) -> bool {
        let due = self.is_due(buffer, now);
        if due {
            self.mark(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_analysis = None;
    }
}
