//! Hand landmark model.
//!
//! Indices follow the 21-point hand topology used by common hand trackers:
//! wrist at 0, then four joints per digit from the palm outward.

use crate::defaults;
use serde::{Deserialize, Serialize};

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// One tracked point in normalized image space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; 0 when the tracker does not report it.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar distance, ignoring depth.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A digit of the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// The four non-thumb fingers.
    pub const FOUR: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn slot(self) -> usize {
        match self {
            Finger::Thumb => 0,
            Finger::Index => 1,
            Finger::Middle => 2,
            Finger::Ring => 3,
            Finger::Pinky => 4,
        }
    }

    /// Knuckle joint. For the thumb this is its MCP, not the CMC.
    pub fn mcp(self) -> usize {
        match self {
            Finger::Thumb => THUMB_MCP,
            Finger::Index => INDEX_MCP,
            Finger::Middle => MIDDLE_MCP,
            Finger::Ring => RING_MCP,
            Finger::Pinky => PINKY_MCP,
        }
    }

    /// Middle joint. The thumb has no PIP; its IP joint plays that role.
    pub fn pip(self) -> usize {
        match self {
            Finger::Thumb => THUMB_IP,
            Finger::Index => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring => RING_PIP,
            Finger::Pinky => PINKY_PIP,
        }
    }

    pub fn dip(self) -> usize {
        match self {
            Finger::Thumb => THUMB_IP,
            Finger::Index => INDEX_DIP,
            Finger::Middle => MIDDLE_DIP,
            Finger::Ring => RING_DIP,
            Finger::Pinky => PINKY_DIP,
        }
    }

    pub fn tip(self) -> usize {
        match self {
            Finger::Thumb => THUMB_TIP,
            Finger::Index => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring => RING_TIP,
            Finger::Pinky => PINKY_TIP,
        }
    }
}

/// The landmark set for one tracked hand in one frame.
///
/// Trackers are expected to report exactly 21 points. Shorter samples are
/// kept representable so malformed input can flow through the pipeline and be
/// rejected by the classifier instead of at deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandSample {
    landmarks: Vec<Landmark>,
}

impl HandSample {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Builds a sample from `(x, y, z)` triples.
    pub fn from_points(points: &[(f32, f32, f32)]) -> Self {
        Self::new(
            points
                .iter()
                .map(|&(x, y, z)| Landmark::new(x, y, z))
                .collect(),
        )
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// True when every anatomical index is present.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= defaults::HAND_LANDMARKS
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.landmarks.first()?;
        Some(self.landmarks.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), lm| {
                (min_x.min(lm.x), min_y.min(lm.y), max_x.max(lm.x), max_y.max(lm.y))
            },
        ))
    }
}

impl From<Vec<Landmark>> for HandSample {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}
