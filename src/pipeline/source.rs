//! Frame sources feeding the pipeline.

use crate::error::{Result, SignstreamError};
use crate::pipeline::types::{Frame, SourceState};

/// Pluggable frame input for the pipeline.
///
/// The pipeline polls [`state`](FrameSource::state) before every read and only
/// calls [`read_frame`](FrameSource::read_frame) when the source is `Ready`.
pub trait FrameSource: Send {
    /// Readiness for the next read.
    fn state(&self) -> SourceState;

    /// Reads the next frame; `Ok(None)` when nothing is available yet.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Name for logging.
    fn name(&self) -> &'static str {
        "source"
    }
}

/// Mock frame source for testing.
#[derive(Debug, Clone)]
pub struct MockFrameSource {
    remaining: Option<u64>,
    sequence: u64,
    paused_polls: u32,
    failing_reads: u32,
    always_fail: bool,
}

impl Default for MockFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFrameSource {
    /// Source that yields empty frames forever.
    pub fn new() -> Self {
        Self {
            remaining: None,
            sequence: 0,
            paused_polls: 0,
            failing_reads: 0,
            always_fail: false,
        }
    }

    /// Configure the mock to end after `count` frames
    pub fn with_frames(mut self, count: u64) -> Self {
        self.remaining = Some(count);
        self
    }

    /// Configure the mock to report `Paused` for the first `polls` state checks
    pub fn with_pause(mut self, polls: u32) -> Self {
        self.paused_polls = polls;
        self
    }

    /// Configure the mock to fail the next `count` reads
    pub fn with_read_failures(mut self, count: u32) -> Self {
        self.failing_reads = count;
        self
    }

    /// Configure the mock to fail every read
    pub fn with_read_failure(mut self) -> Self {
        self.always_fail = true;
        self
    }

    /// Number of frames handed out so far.
    pub fn frames_read(&self) -> u64 {
        self.sequence
    }
}

impl FrameSource for MockFrameSource {
    fn state(&self) -> SourceState {
        if self.paused_polls > 0 {
            SourceState::Paused
        } else if self.remaining == Some(0) {
            SourceState::Ended
        } else {
            SourceState::Ready
        }
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.paused_polls > 0 {
            self.paused_polls -= 1;
            return Ok(None);
        }
        if self.always_fail || self.failing_reads > 0 {
            self.failing_reads = self.failing_reads.saturating_sub(1);
            return Err(SignstreamError::FrameSource {
                message: "mock read failure".to_string(),
            });
        }
        match &mut self.remaining {
            Some(0) => return Ok(None),
            Some(n) => *n -= 1,
            None => {}
        }
        let frame = Frame::empty(self.sequence);
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
