//! Hand landmark model and geometry.

pub mod landmark;
pub mod pose;
pub mod synth;

pub use landmark::{Finger, HandSample, Landmark};
pub use pose::{HandPose, HandShape};
pub use synth::{FingerForm, HandBuilder, ThumbForm};
