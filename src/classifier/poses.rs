//! Canonical static poses, the first classifier tier.

use crate::hand::HandPose;
use crate::hand::landmark::{Finger, PINKY_MCP, RING_MCP};

use Finger::{Index, Middle, Pinky, Ring, Thumb};

/// Minimum fingertip spread for an open hand.
pub const OPEN_SPREAD: f32 = 0.35;

/// Minimum index/middle tip separation for a peace sign.
pub const PEACE_SEPARATION: f32 = 0.30;

/// Compactness ceiling for a closed fist.
const FIST_COMPACTNESS: f32 = 0.5;

/// Maximum sideways lean of a pointing index finger.
pub const POINT_LEAN: f32 = 0.35;

pub const POSES: &[(&str, fn(&HandPose) -> bool)] = &[
    ("Fist", fist),
    ("Point", point),
    ("Peace", peace),
    ("Open Hand", open_hand),
    ("I Love You", i_love_you),
];

/// First canonical pose that matches.
pub fn recognize(pose: &HandPose) -> Option<&'static str> {
    POSES
        .iter()
        .find(|(_, matches)| matches(pose))
        .map(|(label, _)| *label)
}

fn fist(p: &HandPose) -> bool {
    p.extended_count() == 0
        && p.all_curled(&Finger::FOUR)
        && p.compactness() < FIST_COMPACTNESS
        && !p.thumb_above_knuckles()
        && !p.tips_touch(Thumb, Index)
        && !p.thumb_between(RING_MCP, PINKY_MCP)
}

fn point(p: &HandPose) -> bool {
    if !p.only_extended(&[Index]) || !p.is_folded(Thumb) || p.tips_touch(Thumb, Middle) {
        return false;
    }
    let highest_other = [Middle, Ring, Pinky]
        .iter()
        .map(|f| p.tip(*f).y)
        .fold(f32::INFINITY, f32::min);
    let clearance = (highest_other - p.tip(Index).y) / p.palm_size();
    clearance > 0.3 && p.lean(Index) < POINT_LEAN
}

fn peace(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle])
        && p.is_folded(Thumb)
        && p.tip_distance(Index, Middle) >= PEACE_SEPARATION
        && !p.crossed(Index, Middle)
}

fn open_hand(p: &HandPose) -> bool {
    p.extended_count() == 5 && p.spread() >= OPEN_SPREAD
}

fn i_love_you(p: &HandPose) -> bool {
    p.only_extended(&[Thumb, Index, Pinky]) && p.is_folded(Middle) && p.is_folded(Ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{FingerForm, HandBuilder, ThumbForm};

    fn label(builder: HandBuilder) -> Option<&'static str> {
        let sample = builder.build();
        let pose = HandPose::new(&sample).unwrap();
        recognize(&pose)
    }

    #[test]
    fn recognizes_fist() {
        assert_eq!(label(HandBuilder::fist()), Some("Fist"));
    }

    #[test]
    fn recognizes_point() {
        let hand = HandBuilder::fist().finger(Index, FingerForm::Extended);
        assert_eq!(label(hand), Some("Point"));
    }

    #[test]
    fn recognizes_peace() {
        let hand = HandBuilder::fist().fingers(&[Index, Middle], FingerForm::Extended);
        assert_eq!(label(hand), Some("Peace"));
    }

    #[test]
    fn close_fingers_are_not_peace() {
        let hand = HandBuilder::fist()
            .fingers(&[Index, Middle], FingerForm::Extended)
            .spread(0.0);
        assert_eq!(label(hand), None);
    }

    #[test]
    fn recognizes_open_hand() {
        assert_eq!(label(HandBuilder::open_hand()), Some("Open Hand"));
    }

    #[test]
    fn recognizes_i_love_you() {
        let hand = HandBuilder::fist()
            .fingers(&[Index, Pinky], FingerForm::Extended)
            .thumb(ThumbForm::Extended);
        assert_eq!(label(hand), Some("I Love You"));
    }

    #[test]
    fn thumb_tucked_under_is_not_fist() {
        let hand = HandBuilder::fist().thumb(ThumbForm::Between(Index));
        assert_eq!(label(hand), None);
    }

    #[test]
    fn slanted_index_is_not_point() {
        let hand = HandBuilder::fist().finger(Index, FingerForm::Slanted);
        assert_eq!(label(hand), None);
    }
}
