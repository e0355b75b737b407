//! Error types for signstream.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignstreamError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Hand-tracking errors
    #[error("Hand tracker failed to initialize: {message}")]
    TrackerInit { message: String },

    #[error("Hand tracking failed: {message}")]
    Tracking { message: String },

    // Frame source errors
    #[error("Frame source error: {message}")]
    FrameSource { message: String },

    // Semantic analysis errors
    #[error("Semantic analysis failed: {message}")]
    Analysis { message: String },

    // Pipeline lifecycle errors
    #[error("Pipeline is already running")]
    AlreadyRunning,

    // Recorded landmark streams
    #[error("Invalid recording at line {line}: {message}")]
    Recording { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl SignstreamError {
    /// True for failures that prevent the pipeline from running at all.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SignstreamError::TrackerInit { .. } | SignstreamError::AlreadyRunning
        )
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SignstreamError>;
