//! Error types and reporting for the frame loop.

use std::fmt;
use std::sync::Mutex;

/// Errors that can occur while processing a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum StationError {
    /// Recoverable error; the loop moves on to the next frame.
    Recoverable(String),
    /// Fatal error; the loop ends.
    Fatal(String),
}

impl StationError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, StationError::Fatal(_))
    }
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            StationError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for StationError {}

/// Trait for reporting frame loop errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a pipeline stage (`"source"`, `"tracker"`, ...).
    fn report(&self, stage: &str, error: &StationError);
}

/// Reporter that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, stage: &str, error: &StationError) {
        match error {
            StationError::Recoverable(msg) => tracing::debug!(stage, "{msg}"),
            StationError::Fatal(msg) => tracing::error!(stage, "{msg}"),
        }
    }
}

/// Reporter that keeps every error in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    errors: Mutex<Vec<(String, StationError)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<(String, StationError)> {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn fatal_count(&self) -> usize {
        self.errors()
            .iter()
            .filter(|(_, error)| error.is_fatal())
            .count()
    }
}

impl ErrorReporter for MemoryReporter {
    fn report(&self, stage: &str, error: &StationError) {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((stage.to_string(), error.clone()));
    }
}
