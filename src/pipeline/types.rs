//! Data types for the streaming gesture pipeline.

use crate::hand::HandSample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Lifecycle of a [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    #[default]
    Idle,
    Initializing,
    Running,
    Stopping,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Initializing => "initializing",
            PipelineState::Running => "running",
            PipelineState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// How a label was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureType {
    /// Single-frame hand shape.
    Static,
    /// Vocabulary pattern that normally involves motion.
    Dynamic,
    /// Interpretation of several buffered labels.
    Sentence,
    /// Label held steady across consecutive frames.
    Validated,
}

/// Classifier tier that produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    CanonicalPose,
    Alphabet,
    Vocabulary,
    LanguageOverlay,
    Fallback,
}

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::CanonicalPose => "canonical",
            Tier::Alphabet => "alphabet",
            Tier::Vocabulary => "vocabulary",
            Tier::LanguageOverlay => "overlay",
            Tier::Fallback => "fallback",
        }
    }
}

/// One recognition outcome, per frame or per sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub sign: String,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<HandSample>>,
    pub gesture_type: GestureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

impl DetectionResult {
    /// A result for a buffered-label interpretation.
    pub fn sentence(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            sign: text.into(),
            confidence,
            landmarks: None,
            gesture_type: GestureType::Sentence,
            hand_shape: None,
            tier: None,
        }
    }

    /// True when the label came from the fallback tier rather than a positive match.
    pub fn is_low_trust(&self) -> bool {
        self.tier == Some(Tier::Fallback)
    }
}

/// Readiness reported by a frame source before each read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// A frame can be read now.
    Ready,
    /// Temporarily without data; poll again later.
    Paused,
    /// No more frames will arrive.
    Ended,
}

/// A captured video frame handed to the hand tracker.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Encoded or raw pixel data; opaque to the pipeline.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Sequence number for ordering and gap detection.
    pub sequence: u64,
    /// Timestamp when this frame was captured.
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            sequence,
            timestamp: Instant::now(),
        }
    }

    /// A frame with no pixel data, used by sources that carry landmarks out of band.
    pub fn empty(sequence: u64) -> Self {
        Self::new(Vec::new(), 0, 0, sequence)
    }
}

/// Lifecycle notifications published by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StateChanged {
        from: PipelineState,
        to: PipelineState,
    },
    /// A semantic analysis task was spawned for this many labels.
    AnalysisDispatched { labels: usize },
    /// An analysis was due but another one was still in flight.
    AnalysisSkipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_result_serializes_camel_case() {
        let result = DetectionResult {
            sign: "Open Hand".to_string(),
            confidence: 0.85,
            landmarks: None,
            gesture_type: GestureType::Static,
            hand_shape: Some("open".to_string()),
            tier: Some(Tier::CanonicalPose),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sign"], "Open Hand");
        assert_eq!(json["gestureType"], "static");
        assert_eq!(json["handShape"], "open");
        assert_eq!(json["tier"], "canonicalPose");
        assert!(json.get("landmarks").is_none());
    }

    #[test]
    fn sentence_result_has_no_tier() {
        let result = DetectionResult::sentence("I love you.", 0.7);
        assert_eq!(result.gesture_type, GestureType::Sentence);
        assert_eq!(result.tier, None);
        assert!(!result.is_low_trust());
    }

    #[test]
    fn fallback_results_are_low_trust() {
        let mut result = DetectionResult::sentence("x", 0.66);
        result.tier = Some(Tier::Fallback);
        assert!(result.is_low_trust());
    }

    #[test]
    fn state_display() {
        assert_eq!(PipelineState::Idle.to_string(), "idle");
        assert_eq!(PipelineState::Stopping.to_string(), "stopping");
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{"sign":"Hello","confidence":0.8,"gestureType":"dynamic"}"#;
        let result: DetectionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.gesture_type, GestureType::Dynamic);
        assert!(result.landmarks.is_none());
    }
}
