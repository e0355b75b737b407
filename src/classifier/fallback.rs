//! Last-resort labeling from coarse hand features.
//!
//! Nothing here is a positive match: the extended-finger count picks a bucket
//! of plausible labels, fingertip spread and bounding-box shape pick half of it,
//! and the injected PRNG picks within that half. Results are marked with the
//! fallback tier so callers can discount them.

use crate::classifier::poses::OPEN_SPREAD;
use crate::hand::HandPose;
use rand::Rng;
use rand::rngs::StdRng;

/// Lowest confidence a fallback label can carry.
pub const BASE_CONFIDENCE: f32 = 0.65;

/// Random jitter added on top of [`BASE_CONFIDENCE`].
pub const CONFIDENCE_JITTER: f32 = 0.05;

/// Candidate labels per extended-finger count. The first half suits wide or
/// squat hands, the second half narrow upright ones.
const BUCKETS: [&[&str]; 6] = [
    &["Fist", "S", "A", "E"],
    &["Point", "L", "D", "1"],
    &["Peace", "V", "U", "2"],
    &["W", "3", "K", "6"],
    &["4", "Hello", "B", "Please"],
    &["Open Hand", "5", "Hello", "Stop"],
];

/// A chosen fallback label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guess {
    pub label: &'static str,
    pub confidence: f32,
}

/// Candidates the coarse features allow for this hand.
pub fn candidates(pose: &HandPose) -> &'static [&'static str] {
    let bucket = BUCKETS[pose.extended_count().min(5)];
    let half = bucket.len() / 2;
    if is_wide(pose) {
        &bucket[..half]
    } else {
        &bucket[half..]
    }
}

fn is_wide(pose: &HandPose) -> bool {
    pose.spread() >= OPEN_SPREAD || pose.aspect_ratio() < 1.0
}

pub fn guess(pose: &HandPose, rng: &mut StdRng) -> Guess {
    let candidates = candidates(pose);
    let label = candidates[rng.gen_range(0..candidates.len())];
    let confidence = BASE_CONFIDENCE + rng.gen_range(0.0..=CONFIDENCE_JITTER);
    Guess { label, confidence }
}
