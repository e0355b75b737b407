//! Numerals 0-10, tried after the alphabet.

use crate::classifier::poses::OPEN_SPREAD;
use crate::hand::HandPose;
use crate::hand::landmark::Finger;

use Finger::{Index, Middle, Pinky, Ring, Thumb};

pub const NUMBERS: &[(&str, fn(&HandPose) -> bool)] = &[
    ("0", zero),
    ("1", one),
    ("2", two),
    ("3", three),
    ("4", four),
    ("5", five),
    ("6", six),
    ("7", seven),
    ("8", eight),
    ("9", nine),
    ("10", ten),
];

pub fn recognize(pose: &HandPose) -> Option<&'static str> {
    NUMBERS
        .iter()
        .find(|(_, matches)| matches(pose))
        .map(|(label, _)| *label)
}

fn zero(p: &HandPose) -> bool {
    p.all_curled(&Finger::FOUR) && p.tips_touch(Thumb, Index)
}

fn one(p: &HandPose) -> bool {
    p.only_extended(&[Index]) && !p.is_folded(Thumb)
}

fn two(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle]) && !p.is_folded(Thumb) && !p.tips_touch(Thumb, Index)
}

fn three(p: &HandPose) -> bool {
    p.only_extended(&[Thumb, Index, Middle]) && !p.thumb_up()
}

fn four(p: &HandPose) -> bool {
    p.only_extended(&Finger::FOUR) && p.four_spread() >= super::alphabet::FLAT_SPREAD
}

fn five(p: &HandPose) -> bool {
    p.extended_count() == 5 && p.spread() < OPEN_SPREAD
}

// 6-9: thumb holds down the one finger that stays curled.

fn six(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle, Ring]) && p.tips_touch(Thumb, Pinky)
}

fn seven(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle, Pinky]) && p.tips_touch(Thumb, Ring)
}

fn eight(p: &HandPose) -> bool {
    p.only_extended(&[Index, Ring, Pinky]) && p.tips_touch(Thumb, Middle)
}

fn nine(p: &HandPose) -> bool {
    p.only_extended(&[Middle, Ring, Pinky]) && p.tips_touch(Thumb, Index) && p.is_hooked(Index)
}

fn ten(p: &HandPose) -> bool {
    p.only_extended(&[Thumb]) && p.thumb_up() && p.all_curled(&Finger::FOUR)
}
