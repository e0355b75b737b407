//! Terminal rendering of detection results.

use crate::pipeline::sink::ResultSink;
use crate::pipeline::types::{DetectionResult, GestureType};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// How [`StdoutSink`] renders results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputStyle {
    /// One JSON object per line instead of text
    pub json: bool,
    /// ANSI colors (text mode only)
    pub color: bool,
    /// Skip per-frame results; print sentences only
    pub sentences_only: bool,
}

/// Format one result as a single text line.
pub fn format_result(result: &DetectionResult, color: bool) -> String {
    let kind = match result.gesture_type {
        GestureType::Static => "static",
        GestureType::Dynamic => "dynamic",
        GestureType::Sentence => "sentence",
        GestureType::Validated => "validated",
    };

    let mut details = Vec::new();
    if let Some(tier) = result.tier {
        details.push(tier.name().to_string());
    }
    if let Some(shape) = &result.hand_shape {
        details.push(shape.clone());
    }
    let details = if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    };

    let tag = format!("[{kind}]");
    let confidence = format!("{:.2}", result.confidence);

    if !color {
        return format!("{tag} {} {confidence}{details}", result.sign);
    }

    let sign = match result.gesture_type {
        GestureType::Sentence => result.sign.green().bold().to_string(),
        GestureType::Validated => result.sign.cyan().bold().to_string(),
        _ if result.is_low_trust() => result.sign.yellow().to_string(),
        _ => result.sign.clone(),
    };
    format!(
        "{} {sign} {}{}",
        tag.dimmed(),
        confidence.dimmed(),
        details.dimmed()
    )
}

/// Format one result as compact JSON, without landmarks.
pub fn format_json(result: &DetectionResult) -> serde_json::Result<String> {
    let trimmed = DetectionResult {
        landmarks: None,
        ..result.clone()
    };
    serde_json::to_string(&trimmed)
}

/// Prints results to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    style: OutputStyle,
}

impl StdoutSink {
    pub fn new(style: OutputStyle) -> Self {
        Self { style }
    }

    fn render(&self, result: &DetectionResult) -> Option<String> {
        if self.style.sentences_only && result.gesture_type != GestureType::Sentence {
            return None;
        }
        if self.style.json {
            match format_json(result) {
                Ok(line) => Some(line),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to serialize result");
                    None
                }
            }
        } else {
            Some(format_result(result, self.style.color))
        }
    }
}

impl ResultSink for StdoutSink {
    fn deliver(&self, result: DetectionResult) {
        let Some(line) = self.render(&result) else {
            return;
        };
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}") {
            tracing::debug!(error = %e, "stdout closed");
        }
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandBuilder;
    use crate::pipeline::types::Tier;

    fn open_hand() -> DetectionResult {
        DetectionResult {
            sign: "Open Hand".to_string(),
            confidence: 0.85,
            landmarks: Some(vec![HandBuilder::open_hand().build()]),
            gesture_type: GestureType::Static,
            hand_shape: Some("open".to_string()),
            tier: Some(Tier::CanonicalPose),
        }
    }

    #[test]
    fn plain_format_lists_tier_and_shape() {
        assert_eq!(
            format_result(&open_hand(), false),
            "[static] Open Hand 0.85 (canonical, open)"
        );
    }

    #[test]
    fn sentence_format_has_no_details() {
        let result = DetectionResult::sentence("I love you.", 0.7);
        assert_eq!(format_result(&result, false), "[sentence] I love you. 0.70");
    }

    #[test]
    fn colored_format_keeps_text() {
        let line = format_result(&open_hand(), true);
        assert!(line.contains("Open Hand"));
        assert!(line.contains('\u{1b}'));
    }

    #[test]
    fn json_format_drops_landmarks() {
        let line = format_json(&open_hand()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["sign"], "Open Hand");
        assert_eq!(value["gestureType"], "static");
        assert!(value.get("landmarks").is_none());
    }

    #[test]
    fn sentences_only_skips_frames() {
        let sink = StdoutSink::new(OutputStyle {
            sentences_only: true,
            ..OutputStyle::default()
        });
        assert_eq!(sink.render(&open_hand()), None);
        assert!(
            sink.render(&DetectionResult::sentence("Hello.", 0.9))
                .is_some()
        );
    }
}
