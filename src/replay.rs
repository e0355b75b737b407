//! Recorded landmark streams.
//!
//! A recording is a JSON-lines file with one frame per line. Each line holds
//! either a list of hands (each a list of `{x, y, z}` points) or a single hand.
//! Blank lines are skipped. Replaying pairs a [`RecordedSource`] with a
//! [`RecordingTrackerFactory`] that hands back the recorded landmarks for each
//! frame sequence number.

use crate::error::{Result, SignstreamError};
use crate::hand::HandSample;
use crate::pipeline::source::FrameSource;
use crate::pipeline::tracker::{HandTracker, TrackerFactory};
use crate::pipeline::types::{Frame, SourceState};
use crate::settings::TrackerConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameLine {
    Hands(Vec<HandSample>),
    Hand(HandSample),
}

impl From<FrameLine> for Vec<HandSample> {
    fn from(line: FrameLine) -> Self {
        match line {
            FrameLine::Hands(hands) => hands,
            FrameLine::Hand(hand) => vec![hand],
        }
    }
}

/// Parses one frame: a list of hands or a single hand.
pub fn parse_frame(json: &str) -> Result<Vec<HandSample>> {
    let line: FrameLine = serde_json::from_str(json)?;
    Ok(line.into())
}

/// An in-memory landmark recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    frames: Arc<Vec<Vec<HandSample>>>,
}

impl Recording {
    pub fn new(frames: Vec<Vec<HandSample>>) -> Self {
        Self {
            frames: Arc::new(frames),
        }
    }

    /// Parses JSON-lines text. Errors name the 1-based line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut frames = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let frame = parse_frame(line).map_err(|e| SignstreamError::Recording {
                line: index + 1,
                message: e.to_string(),
            })?;
            frames.push(frame);
        }
        Ok(Self::new(frames))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let recording = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), frames = recording.len(), "recording loaded");
        Ok(recording)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&[HandSample]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    /// Frame source yielding one frame per recorded line.
    pub fn source(&self) -> RecordedSource {
        RecordedSource {
            total: self.len() as u64,
            next: 0,
        }
    }

    /// Tracker factory answering with the recorded landmarks.
    pub fn tracker_factory(&self) -> RecordingTrackerFactory {
        RecordingTrackerFactory {
            frames: self.frames.clone(),
        }
    }
}

/// Finite frame source paired with a recording.
#[derive(Debug, Clone)]
pub struct RecordedSource {
    total: u64,
    next: u64,
}

impl FrameSource for RecordedSource {
    fn state(&self) -> SourceState {
        if self.next >= self.total {
            SourceState::Ended
        } else {
            SourceState::Ready
        }
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.next >= self.total {
            return Ok(None);
        }
        let frame = Frame::empty(self.next);
        self.next += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Builds trackers that look frames up by sequence number.
#[derive(Debug, Clone)]
pub struct RecordingTrackerFactory {
    frames: Arc<Vec<Vec<HandSample>>>,
}

#[async_trait]
impl TrackerFactory for RecordingTrackerFactory {
    async fn create(&self, config: &TrackerConfig) -> Result<Box<dyn HandTracker>> {
        tracing::debug!(
            threshold = config.detection_threshold,
            max_hands = config.max_hands,
            "recording tracker created"
        );
        Ok(Box::new(RecordingTracker {
            frames: self.frames.clone(),
            max_hands: config.max_hands,
        }))
    }
}

struct RecordingTracker {
    frames: Arc<Vec<Vec<HandSample>>>,
    max_hands: usize,
}

#[async_trait]
impl HandTracker for RecordingTracker {
    async fn track(&mut self, frame: &Frame) -> Result<Vec<HandSample>> {
        let hands = usize::try_from(frame.sequence)
            .ok()
            .and_then(|index| self.frames.get(index))
            .ok_or_else(|| SignstreamError::Tracking {
                message: format!("no recorded frame {}", frame.sequence),
            })?;
        Ok(hands.iter().take(self.max_hands).cloned().collect())
    }

    async fn close(&mut self) {}
}
