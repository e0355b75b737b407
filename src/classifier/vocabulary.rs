//! Named vocabulary patterns.
//!
//! These signs normally involve motion or a location on the body. From a single
//! frame they are approximated by orientation (fingers sideways or pointing
//! down) and by where the hand sits in the frame.

use crate::hand::HandPose;
use crate::hand::landmark::Finger;

use Finger::{Index, Middle, Pinky, Ring, Thumb};

/// Wrist height (normalized image y) above which the hand is near the face.
pub const FACE_LINE: f32 = 0.5;

pub const VOCABULARY: &[(&str, fn(&HandPose) -> bool)] = &[
    ("Hello", hello),
    ("Help", help),
    ("Thank You", thank_you),
    ("Please", please),
    ("Bad", bad),
    ("Finish", finish),
    ("You", you),
    ("Love", love),
    ("How are you?", how_are_you),
    ("More", more),
    ("Water", water),
    ("No", no),
    ("Sorry", sorry),
    ("Stop", stop),
];

pub fn recognize(pose: &HandPose) -> Option<&'static str> {
    VOCABULARY
        .iter()
        .find(|(_, matches)| matches(pose))
        .map(|(label, _)| *label)
}

fn near_face(p: &HandPose) -> bool {
    p.wrist().y < FACE_LINE
}

fn flat_sideways(p: &HandPose) -> bool {
    p.all_horizontal(&Finger::FOUR)
}

// Greetings

fn hello(p: &HandPose) -> bool {
    flat_sideways(p) && p.is_extended(Thumb) && near_face(p)
}

fn how_are_you(p: &HandPose) -> bool {
    p.all_hooked(&[Index, Middle]) && p.all_curled(&[Ring, Pinky]) && !p.is_extended(Thumb)
}

// Courtesy

fn thank_you(p: &HandPose) -> bool {
    flat_sideways(p) && !p.is_extended(Thumb) && near_face(p)
}

fn please(p: &HandPose) -> bool {
    flat_sideways(p) && !p.is_extended(Thumb) && !near_face(p)
}

fn sorry(p: &HandPose) -> bool {
    p.only_extended(&[Thumb, Index]) && p.thumb_up()
}

fn no(p: &HandPose) -> bool {
    p.is_extended(Index)
        && p.is_extended(Middle)
        && p.all_curled(&[Ring, Pinky])
        && p.tips_touch(Thumb, Index)
}

// Needs and reactions

fn help(p: &HandPose) -> bool {
    flat_sideways(p) && p.is_extended(Thumb) && !near_face(p)
}

fn bad(p: &HandPose) -> bool {
    p.all_point_down(&Finger::FOUR) && !p.is_extended(Thumb)
}

fn finish(p: &HandPose) -> bool {
    p.all_point_down(&Finger::FOUR) && p.is_extended(Thumb)
}

fn you(p: &HandPose) -> bool {
    p.is_horizontal(Index) && p.all_curled(&[Middle, Ring, Pinky]) && !p.is_extended(Thumb)
}

fn love(p: &HandPose) -> bool {
    p.only_extended(&[Index, Pinky]) && p.is_folded(Thumb)
}

fn more(p: &HandPose) -> bool {
    p.all_horizontal(&[Index, Middle]) && p.all_curled(&[Ring, Pinky]) && p.is_extended(Thumb)
}

fn water(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle, Pinky]) && !p.tips_touch(Thumb, Ring)
}

fn stop(p: &HandPose) -> bool {
    p.only_extended(&[Middle, Ring, Pinky]) && !p.tips_touch(Thumb, Index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{alphabet, numbers, poses};
    use crate::hand::{FingerForm, HandBuilder, ThumbForm};
    use FingerForm::{Extended, Hooked, Horizontal};

    fn word(builder: HandBuilder) -> Option<&'static str> {
        let sample = builder.build();
        let pose = HandPose::new(&sample).unwrap();
        assert_eq!(poses::recognize(&pose), None, "shadowed by a pose");
        assert_eq!(alphabet::recognize(&pose), None, "shadowed by a letter");
        assert_eq!(numbers::recognize(&pose), None, "shadowed by a number");
        recognize(&pose)
    }

    fn sideways() -> HandBuilder {
        HandBuilder::fist().fingers(&Finger::FOUR, Horizontal)
    }

    #[test]
    fn flat_hand_position_selects_word() {
        let raised = -0.5;
        assert_eq!(
            word(sideways().thumb(ThumbForm::Extended).offset(0.0, raised)),
            Some("Hello")
        );
        assert_eq!(word(sideways().thumb(ThumbForm::Extended)), Some("Help"));
        assert_eq!(word(sideways().offset(0.0, raised)), Some("Thank You"));
        assert_eq!(word(sideways()), Some("Please"));
    }

    #[test]
    fn downward_hands() {
        let down = HandBuilder::fist()
            .fingers(&Finger::FOUR, Extended)
            .inverted();
        assert_eq!(word(down.clone()), Some("Bad"));
        assert_eq!(word(down.thumb(ThumbForm::Extended)), Some("Finish"));
    }

    #[test]
    fn remaining_words() {
        let fist = HandBuilder::fist;
        let cases: Vec<(&str, HandBuilder)> = vec![
            ("You", fist().finger(Index, Horizontal)),
            ("Love", fist().fingers(&[Index, Pinky], Extended)),
            ("How are you?", fist().fingers(&[Index, Middle], Hooked)),
            (
                "More",
                fist()
                    .fingers(&[Index, Middle], Horizontal)
                    .thumb(ThumbForm::Extended),
            ),
            ("Water", fist().fingers(&[Index, Middle, Pinky], Extended)),
            (
                "No",
                fist()
                    .fingers(&[Index, Middle], Extended)
                    .thumb(ThumbForm::Touching(Index)),
            ),
            ("Sorry", fist().finger(Index, Extended).thumb(ThumbForm::Up)),
            ("Stop", fist().fingers(&[Middle, Ring, Pinky], Extended)),
        ];
        for (expected, builder) in cases {
            assert_eq!(word(builder), Some(expected), "fixture for {expected}");
        }
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<&str> = VOCABULARY.iter().map(|(l, _)| *l).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), VOCABULARY.len());
    }
}
