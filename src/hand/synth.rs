//! Synthetic hand construction.
//!
//! Builds anatomically plausible 21-point samples from a per-finger description,
//! so tests, benchmarks and demos can produce specific hand shapes without a
//! camera or tracker.

use crate::hand::landmark::{Finger, HandSample, Landmark};

/// Form of a non-thumb finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerForm {
    /// Straight up from the knuckle.
    Extended,
    /// Extended but leaning sideways.
    Slanted,
    /// Curled into the palm.
    Curled,
    /// Knuckle raised, tip bent back down.
    Hooked,
    /// Pointing sideways across the palm.
    Horizontal,
}

/// Form of the thumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbForm {
    /// Out to the side, angled up.
    Extended,
    /// Folded across the curled fingers.
    Folded,
    /// Folded all the way across to the ring and pinky.
    Across,
    /// Resting along the side of the index finger.
    Alongside,
    /// Pointing straight up.
    Up,
    /// Pointing straight out sideways.
    Side,
    /// Tucked under the fingers between this finger and the next one.
    Between(Finger),
    /// Tip pressed against the tip of the given finger.
    Touching(Finger),
}

const WRIST: (f32, f32) = (0.50, 0.90);
const THUMB_CMC: (f32, f32) = (0.40, 0.84);
const THUMB_MCP: (f32, f32) = (0.34, 0.76);
/// Knuckle positions for index, middle, ring and pinky.
const KNUCKLES: [(f32, f32); 4] = [(0.42, 0.62), (0.48, 0.60), (0.54, 0.61), (0.60, 0.64)];
/// Sideways fan per finger at full spread.
const FAN: [f32; 4] = [-0.02, 0.0, 0.02, 0.04];
const LENGTH: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

/// Builder for a single synthetic hand.
#[derive(Debug, Clone)]
pub struct HandBuilder {
    fingers: [FingerForm; 4],
    thumb: ThumbForm,
    spread: f32,
    crossed: bool,
    scale: f32,
    offset: (f32, f32),
    inverted: bool,
}

impl Default for HandBuilder {
    fn default() -> Self {
        Self::fist()
    }
}

impl HandBuilder {
    /// Every finger curled, thumb folded across them.
    pub fn fist() -> Self {
        Self {
            fingers: [FingerForm::Curled; 4],
            thumb: ThumbForm::Folded,
            spread: 1.0,
            crossed: false,
            scale: 1.0,
            offset: (0.0, 0.0),
            inverted: false,
        }
    }

    /// Every digit extended and fanned out.
    pub fn open_hand() -> Self {
        Self::fist()
            .fingers(&Finger::FOUR, FingerForm::Extended)
            .thumb(ThumbForm::Extended)
    }

    pub fn finger(mut self, finger: Finger, form: FingerForm) -> Self {
        if finger != Finger::Thumb {
            self.fingers[finger.slot() - 1] = form;
        }
        self
    }

    pub fn fingers(mut self, fingers: &[Finger], form: FingerForm) -> Self {
        for finger in fingers {
            self = self.finger(*finger, form);
        }
        self
    }

    pub fn thumb(mut self, form: ThumbForm) -> Self {
        self.thumb = form;
        self
    }

    /// Fan factor for extended fingers; 0 keeps them parallel.
    pub fn spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    /// Crosses the index finger over the middle finger.
    pub fn crossed(mut self) -> Self {
        self.crossed = true;
        self
    }

    /// Scales the hand about the image center (smaller = farther from the camera).
    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Moves the whole hand in image space.
    pub fn offset(mut self, dx: f32, dy: f32) -> Self {
        self.offset = (dx, dy);
        self
    }

    /// Flips the hand vertically so the fingers point toward the bottom of the frame.
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    pub fn build(&self) -> HandSample {
        let mut points = [(0.0f32, 0.0f32); 21];
        points[0] = WRIST;
        points[1] = THUMB_CMC;
        points[2] = THUMB_MCP;

        for (i, form) in self.fingers.iter().enumerate() {
            let joints = finger_joints(i, *form, self.spread);
            let base = 5 + i * 4;
            points[base] = KNUCKLES[i];
            points[base + 1..base + 4].copy_from_slice(&joints);
        }

        if self.crossed {
            let middle_tip = points[12];
            points[7] = (middle_tip.0 + 0.01, points[7].1);
            points[8] = (middle_tip.0 + 0.02, points[8].1);
        }

        let (ip, tip) = self.thumb_joints(&points);
        points[3] = ip;
        points[4] = tip;

        HandSample::new(points.iter().map(|&p| self.place(p)).collect())
    }

    fn thumb_joints(&self, points: &[(f32, f32); 21]) -> ((f32, f32), (f32, f32)) {
        match self.thumb {
            ThumbForm::Extended => ((0.28, 0.70), (0.22, 0.64)),
            ThumbForm::Folded => ((0.38, 0.70), (0.49, 0.72)),
            ThumbForm::Across => ((0.44, 0.71), (0.57, 0.70)),
            ThumbForm::Alongside => ((0.37, 0.66), (0.37, 0.57)),
            ThumbForm::Up => ((0.35, 0.62), (0.35, 0.50)),
            ThumbForm::Side => ((0.27, 0.74), (0.20, 0.74)),
            ThumbForm::Between(finger) => {
                let slot = finger.slot().clamp(1, 3) - 1;
                let (ax, ay) = KNUCKLES[slot];
                let (bx, _) = KNUCKLES[slot + 1];
                ((0.38, 0.70), ((ax + bx) / 2.0, ay - 0.02))
            }
            ThumbForm::Touching(finger) => {
                let tip = points[finger.tip()];
                let ip = ((THUMB_MCP.0 + tip.0) / 2.0 - 0.03, (THUMB_MCP.1 + tip.1) / 2.0);
                (ip, tip)
            }
        }
    }

    fn place(&self, (x, y): (f32, f32)) -> Landmark {
        let x = 0.5 + (x - 0.5) * self.scale + self.offset.0;
        let mut y = 0.5 + (y - 0.5) * self.scale + self.offset.1;
        if self.inverted {
            y = 1.0 - y;
        }
        Landmark::new(x, y, 0.0)
    }
}

/// PIP, DIP and tip for finger `i` (0 = index).
fn finger_joints(i: usize, form: FingerForm, spread: f32) -> [(f32, f32); 3] {
    let (mx, my) = KNUCKLES[i];
    let len = LENGTH[i];
    match form {
        FingerForm::Extended => {
            let dx = FAN[i] * spread;
            [
                (mx + dx, my - 0.10 * len),
                (mx + dx * 1.6, my - 0.17 * len),
                (mx + dx * 2.2, my - 0.23 * len),
            ]
        }
        FingerForm::Slanted => [
            (mx - 0.06 * len, my - 0.08 * len),
            (mx - 0.10 * len, my - 0.13 * len),
            (mx - 0.14 * len, my - 0.18 * len),
        ],
        FingerForm::Curled => [(mx, my - 0.07), (mx, my - 0.02), (mx, my + 0.03)],
        FingerForm::Hooked => [(mx, my - 0.09), (mx, my - 0.10), (mx, my - 0.05)],
        FingerForm::Horizontal => [
            (mx - 0.09 * len, my + 0.005),
            (mx - 0.15 * len, my + 0.010),
            (mx - 0.21 * len, my + 0.015),
        ],
    }
}
