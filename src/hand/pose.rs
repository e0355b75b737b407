//! Geometric primitives over a complete hand sample.
//!
//! Every distance is normalized by palm size (wrist to middle knuckle) so the
//! same thresholds hold whether the hand is near the camera or far from it.

use crate::hand::landmark::{
    Finger, HandSample, INDEX_MCP, Landmark, MIDDLE_MCP, PINKY_MCP, THUMB_IP, WRIST,
};

/// Normalized tip distance under which two fingertips count as touching.
pub const TOUCH_DISTANCE: f32 = 0.25;

/// How much farther from the pinky knuckle the thumb tip must be than its IP joint
/// for the thumb to count as extended.
const THUMB_REACH: f32 = 1.05;

/// Minimum normalized thumb-tip to index-knuckle distance for an extended thumb.
const THUMB_CLEARANCE: f32 = 0.35;

/// Minimum normalized reach for a finger to count as pointing somewhere.
const MIN_REACH: f32 = 0.4;

/// Coarse shape tag attached to every detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandShape {
    Fist,
    Point,
    Vee,
    Three,
    Four,
    Open,
    Hook,
    Pinch,
    Mixed,
}

impl HandShape {
    pub fn tag(self) -> &'static str {
        match self {
            HandShape::Fist => "fist",
            HandShape::Point => "point",
            HandShape::Vee => "vee",
            HandShape::Three => "three",
            HandShape::Four => "four",
            HandShape::Open => "open",
            HandShape::Hook => "hook",
            HandShape::Pinch => "pinch",
            HandShape::Mixed => "mixed",
        }
    }
}

/// Read-only view of a complete hand with precomputed extension flags.
#[derive(Debug, Clone, Copy)]
pub struct HandPose<'a> {
    sample: &'a HandSample,
    extended: [bool; 5],
    palm: f32,
}

impl<'a> HandPose<'a> {
    /// Returns `None` for samples missing any anatomical index.
    pub fn new(sample: &'a HandSample) -> Option<Self> {
        if !sample.is_complete() {
            return None;
        }
        let lm = sample.landmarks();
        let palm = lm[WRIST].distance(&lm[MIDDLE_MCP]).max(1e-4);
        let mut pose = Self {
            sample,
            extended: [false; 5],
            palm,
        };
        for finger in Finger::ALL {
            pose.extended[finger.slot()] = pose.compute_extended(finger);
        }
        Some(pose)
    }

    fn compute_extended(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => {
                let pinky = self.at(PINKY_MCP);
                let tip = self.tip(Finger::Thumb);
                tip.distance(&pinky) > self.at(THUMB_IP).distance(&pinky) * THUMB_REACH
                    && self.norm(tip.distance(&self.at(INDEX_MCP))) > THUMB_CLEARANCE
            }
            _ => {
                let tip = self.tip(finger);
                let pip = self.at(finger.pip());
                let mcp = self.at(finger.mcp());
                tip.y < pip.y && pip.y < mcp.y
            }
        }
    }

    pub fn sample(&self) -> &'a HandSample {
        self.sample
    }

    /// Landmark at an anatomical index.
    pub fn at(&self, index: usize) -> Landmark {
        self.sample.landmarks()[index]
    }

    pub fn tip(&self, finger: Finger) -> Landmark {
        self.at(finger.tip())
    }

    pub fn wrist(&self) -> Landmark {
        self.at(WRIST)
    }

    /// Wrist to middle knuckle, in image units.
    pub fn palm_size(&self) -> f32 {
        self.palm
    }

    fn norm(&self, distance: f32) -> f32 {
        distance / self.palm
    }

    /// Finger-extension boolean: `tip.y < pip.y < mcp.y` (distance-based for the thumb).
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.extended[finger.slot()]
    }

    pub fn extended_count(&self) -> usize {
        self.extended.iter().filter(|&&e| e).count()
    }

    /// True when exactly the given fingers are extended.
    pub fn only_extended(&self, fingers: &[Finger]) -> bool {
        Finger::ALL
            .iter()
            .all(|f| self.is_extended(*f) == fingers.contains(f))
    }

    /// Curl primitive: the tip has folded back toward the wrist past the middle joint.
    ///
    /// For the thumb, the tip has crossed toward the pinky side of the palm.
    pub fn is_folded(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => {
                let pinky = self.at(PINKY_MCP);
                self.tip(Finger::Thumb).distance(&pinky) < self.at(THUMB_IP).distance(&pinky)
            }
            _ => {
                let wrist = self.wrist();
                self.tip(finger).distance(&wrist) < self.at(finger.pip()).distance(&wrist)
            }
        }
    }

    /// True when every listed finger is folded.
    pub fn all_folded(&self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|f| self.is_folded(*f))
    }

    /// Folded flat into the palm: no raised knuckle, not pointing sideways.
    pub fn is_curled(&self, finger: Finger) -> bool {
        self.is_folded(finger) && !self.is_hooked(finger) && !self.is_horizontal(finger)
    }

    pub fn all_curled(&self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|f| self.is_curled(*f))
    }

    pub fn all_hooked(&self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|f| self.is_hooked(*f))
    }

    pub fn all_horizontal(&self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|f| self.is_horizontal(*f))
    }

    pub fn all_point_down(&self, fingers: &[Finger]) -> bool {
        fingers.iter().all(|f| self.points_down(*f))
    }

    /// Raised knuckle with the tip bent back down, but still above the knuckle.
    pub fn is_hooked(&self, finger: Finger) -> bool {
        if finger == Finger::Thumb {
            return false;
        }
        let tip = self.tip(finger);
        let pip = self.at(finger.pip());
        let mcp = self.at(finger.mcp());
        pip.y < mcp.y && tip.y > pip.y && tip.y < mcp.y
    }

    /// The finger points sideways rather than up or down.
    pub fn is_horizontal(&self, finger: Finger) -> bool {
        let tip = self.tip(finger);
        let mcp = self.at(finger.mcp());
        let dx = (tip.x - mcp.x).abs();
        let dy = (tip.y - mcp.y).abs();
        dx > dy * 1.5 && self.norm(dx) > MIN_REACH
    }

    /// The finger reaches well below its knuckle.
    pub fn points_down(&self, finger: Finger) -> bool {
        let tip = self.tip(finger);
        let mcp = self.at(finger.mcp());
        self.norm(tip.y - mcp.y) > MIN_REACH
    }

    /// Thumbs-up: extended thumb with its tip clearly above the index knuckle.
    pub fn thumb_up(&self) -> bool {
        self.is_extended(Finger::Thumb)
            && self.norm(self.at(INDEX_MCP).y - self.tip(Finger::Thumb).y) > 0.2
    }

    /// Normalized distance between two fingertips.
    pub fn tip_distance(&self, a: Finger, b: Finger) -> f32 {
        self.norm(self.tip(a).distance(&self.tip(b)))
    }

    /// Normalized distance between two landmarks.
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.norm(self.at(a).distance(&self.at(b)))
    }

    pub fn tips_touch(&self, a: Finger, b: Finger) -> bool {
        self.tip_distance(a, b) < TOUCH_DISTANCE
    }

    /// Mean normalized gap between adjacent fingertips, thumb through pinky.
    pub fn spread(&self) -> f32 {
        let gaps: f32 = Finger::ALL
            .windows(2)
            .map(|pair| self.tip_distance(pair[0], pair[1]))
            .sum();
        gaps / 4.0
    }

    /// Mean normalized gap between adjacent fingertips, index through pinky.
    pub fn four_spread(&self) -> f32 {
        let gaps: f32 = Finger::FOUR
            .windows(2)
            .map(|pair| self.tip_distance(pair[0], pair[1]))
            .sum();
        gaps / 3.0
    }

    /// The tips of `a` and `b` sit on opposite sides compared to their knuckles.
    pub fn crossed(&self, a: Finger, b: Finger) -> bool {
        let tips = self.tip(a).x - self.tip(b).x;
        let knuckles = self.at(a.mcp()).x - self.at(b.mcp()).x;
        tips * knuckles < 0.0
    }

    /// Normalized sideways lean of a finger, tip relative to knuckle.
    pub fn lean(&self, finger: Finger) -> f32 {
        self.norm((self.tip(finger).x - self.at(finger.mcp()).x).abs())
    }

    /// Thumb tip sits higher in the frame than the index knuckle.
    pub fn thumb_above_knuckles(&self) -> bool {
        self.tip(Finger::Thumb).y < self.at(INDEX_MCP).y
    }

    /// Mean normalized distance of the five tips from the middle knuckle.
    pub fn compactness(&self) -> f32 {
        let center = self.at(MIDDLE_MCP);
        let total: f32 = Finger::ALL
            .iter()
            .map(|f| self.norm(self.tip(*f).distance(&center)))
            .sum();
        total / 5.0
    }

    /// Bounding-box height over width.
    pub fn aspect_ratio(&self) -> f32 {
        match self.sample.bounds() {
            Some((min_x, min_y, max_x, max_y)) => (max_y - min_y) / (max_x - min_x).max(1e-4),
            None => 1.0,
        }
    }

    /// Thumb tip x lies between two knuckles (either hand orientation).
    pub fn thumb_between(&self, a: usize, b: usize) -> bool {
        let x = self.tip(Finger::Thumb).x;
        let (lo, hi) = {
            let (xa, xb) = (self.at(a).x, self.at(b).x);
            if xa <= xb { (xa, xb) } else { (xb, xa) }
        };
        x >= lo && x <= hi
    }

    pub fn shape(&self) -> HandShape {
        let four_extended = Finger::FOUR.iter().filter(|f| self.is_extended(**f)).count();
        match self.extended_count() {
            0 => {
                if self.tips_touch(Finger::Thumb, Finger::Index) {
                    HandShape::Pinch
                } else if Finger::FOUR.iter().any(|f| self.is_hooked(*f)) {
                    HandShape::Hook
                } else {
                    HandShape::Fist
                }
            }
            1 if self.is_extended(Finger::Index) => HandShape::Point,
            2 if self.is_extended(Finger::Index) && self.is_extended(Finger::Middle) => {
                HandShape::Vee
            }
            3 => HandShape::Three,
            4 if four_extended == 4 => HandShape::Four,
            5 => HandShape::Open,
            _ => HandShape::Mixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::synth::{FingerForm, HandBuilder, ThumbForm};

    #[test]
    fn rejects_incomplete_sample() {
        let sample = HandSample::new(vec![Landmark::default(); 12]);
        assert!(HandPose::new(&sample).is_none());
    }

    #[test]
    fn open_hand_has_all_fingers_extended() {
        let sample = HandBuilder::open_hand().build();
        let pose = HandPose::new(&sample).unwrap();
        for finger in Finger::ALL {
            assert!(pose.is_extended(finger), "{finger:?} should be extended");
        }
        assert_eq!(pose.extended_count(), 5);
        assert_eq!(pose.shape(), HandShape::Open);
    }

    #[test]
    fn fist_has_everything_folded() {
        let sample = HandBuilder::fist().build();
        let pose = HandPose::new(&sample).unwrap();
        assert_eq!(pose.extended_count(), 0);
        assert!(pose.all_folded(&Finger::ALL));
        assert_eq!(pose.shape(), HandShape::Fist);
        assert!(pose.compactness() < 0.5);
    }

    #[test]
    fn only_extended_matches_exact_set() {
        let sample = HandBuilder::fist()
            .finger(Finger::Index, FingerForm::Extended)
            .finger(Finger::Middle, FingerForm::Extended)
            .build();
        let pose = HandPose::new(&sample).unwrap();
        assert!(pose.only_extended(&[Finger::Index, Finger::Middle]));
        assert!(!pose.only_extended(&[Finger::Index]));
        assert_eq!(pose.shape(), HandShape::Vee);
    }

    #[test]
    fn hooked_finger_is_not_extended() {
        let sample = HandBuilder::fist()
            .finger(Finger::Index, FingerForm::Hooked)
            .build();
        let pose = HandPose::new(&sample).unwrap();
        assert!(pose.is_hooked(Finger::Index));
        assert!(!pose.is_extended(Finger::Index));
        assert_eq!(pose.shape(), HandShape::Hook);
    }

    #[test]
    fn horizontal_finger_is_neither_extended_nor_folded() {
        let sample = HandBuilder::fist()
            .finger(Finger::Index, FingerForm::Horizontal)
            .build();
        let pose = HandPose::new(&sample).unwrap();
        assert!(pose.is_horizontal(Finger::Index));
        assert!(!pose.is_extended(Finger::Index));
        assert!(!pose.is_folded(Finger::Index));
    }

    #[test]
    fn inverted_hand_points_down() {
        let sample = HandBuilder::fist()
            .finger(Finger::Index, FingerForm::Extended)
            .inverted()
            .build();
        let pose = HandPose::new(&sample).unwrap();
        assert!(pose.points_down(Finger::Index));
        assert!(!pose.is_extended(Finger::Index));
        assert!(!pose.points_down(Finger::Middle));
    }

    #[test]
    fn thumb_forms() {
        let up = HandBuilder::fist().thumb(ThumbForm::Up).build();
        let pose = HandPose::new(&up).unwrap();
        assert!(pose.thumb_up());

        let side = HandBuilder::fist().thumb(ThumbForm::Side).build();
        let pose = HandPose::new(&side).unwrap();
        assert!(pose.is_extended(Finger::Thumb));
        assert!(pose.is_horizontal(Finger::Thumb));
        assert!(!pose.thumb_up());

        let folded = HandBuilder::fist().thumb(ThumbForm::Folded).build();
        let pose = HandPose::new(&folded).unwrap();
        assert!(!pose.is_extended(Finger::Thumb));
        assert!(pose.is_folded(Finger::Thumb));
    }

    #[test]
    fn touching_thumb_meets_fingertip() {
        let sample = HandBuilder::fist()
            .thumb(ThumbForm::Touching(Finger::Middle))
            .build();
        let pose = HandPose::new(&sample).unwrap();
        assert!(pose.tips_touch(Finger::Thumb, Finger::Middle));
    }

    #[test]
    fn distances_are_scale_invariant() {
        let near = HandBuilder::open_hand().build();
        let far = HandBuilder::open_hand().scaled(0.5).build();
        let near = HandPose::new(&near).unwrap();
        let far = HandPose::new(&far).unwrap();
        assert!((near.spread() - far.spread()).abs() < 1e-3);
        assert!((near.tip_distance(Finger::Index, Finger::Pinky)
            - far.tip_distance(Finger::Index, Finger::Pinky))
        .abs()
            < 1e-3);
    }
}
