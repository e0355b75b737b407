//! Default configuration constants for signstream.
//!
//! Shared by the config file types, the pipeline, and the analysis adapter so
//! every entry point starts from the same values.

/// Default detection sensitivity (1-10).
///
/// Divided by ten to produce the tracker's detection and tracking thresholds.
pub const SENSITIVITY: u8 = 5;

/// Lowest accepted sensitivity.
pub const MIN_SENSITIVITY: u8 = 1;

/// Highest accepted sensitivity.
pub const MAX_SENSITIVITY: u8 = 10;

/// Maximum number of hands the tracker is asked to report per frame.
pub const MAX_HANDS: usize = 2;

/// Landmarks in a complete hand sample.
pub const HAND_LANDMARKS: usize = 21;

/// Per-frame labels must score strictly above this to enter the sentence buffer.
///
/// Fallback-tier labels score 0.65-0.70, so they pass this gate; raise it
/// above 0.7 to keep fabricated labels out of sentences.
pub const CONFIDENCE_GATE: f32 = 0.6;

/// Consecutive gated frames with the same label before it is reported as validated.
pub const VALIDATION_FRAMES: u32 = 3;

/// Sentence buffer capacity.
pub const SENTENCE_CAPACITY: usize = 10;

/// Minimum time between two semantic analyses in milliseconds.
pub const ANALYSIS_INTERVAL_MS: u64 = 3000;

/// Minimum buffered labels before a semantic analysis is worth asking for.
pub const MIN_ANALYSIS_LABELS: usize = 2;

/// Response budget for the language model.
pub const ANALYSIS_MAX_TOKENS: u32 = 150;

/// Low temperature keeps interpretations close to deterministic.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Upper bound on a single language-model request.
pub const ANALYSIS_TIMEOUT_MS: u64 = 5000;

/// Default chat-completions model.
pub const ANALYSIS_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible API root.
pub const ANALYSIS_BASE_URL: &str = "https://api.openai.com/v1";

/// Frame polling interval (~60Hz).
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Consecutive frame-source read failures before the frame loop gives up.
pub const MAX_CONSECUTIVE_SOURCE_ERRORS: u32 = 10;
