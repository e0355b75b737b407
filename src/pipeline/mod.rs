//! Streaming gesture pipeline.
//!
//! A single tokio task pulls frames from a [`FrameSource`], hands them to a
//! [`HandTracker`], classifies the landmarks and forwards each result to a
//! [`ResultSink`]. Sentence analysis runs in its own task so a slow language
//! model never stalls the frame loop.

pub mod error;
mod frame_loop;
pub mod orchestrator;
pub mod sink;
pub mod source;
pub mod tracker;
pub mod types;

pub use error::{ErrorReporter, LogReporter, MemoryReporter, StationError};
pub use frame_loop::LoopExit;
pub use orchestrator::{Pipeline, PipelineConfig};
pub use sink::{ChannelSink, CollectorSink, ResultSink};
pub use source::{FrameSource, MockFrameSource};
pub use tracker::{HandTracker, MockTrackerFactory, TrackerFactory};
pub use types::{
    DetectionResult, Frame, GestureType, PipelineEvent, PipelineState, SourceState, Tier,
};
