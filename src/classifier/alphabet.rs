//! Fingerspelled letters A-Z.
//!
//! Predicates are tried in alphabetical order and the first match wins. Letters
//! that need motion (J, Z) are approximated by their final hand shape.

use crate::classifier::poses::POINT_LEAN;
use crate::hand::HandPose;
use crate::hand::landmark::{Finger, INDEX_MCP, MIDDLE_MCP, PINKY_MCP, RING_MCP};

use Finger::{Index, Middle, Pinky, Ring, Thumb};

/// Tip separation at which two raised fingers stop reading as "together".
pub const TOGETHER: f32 = 0.25;

/// Mean knuckle-to-knuckle gap below which four raised fingers read as a flat hand.
pub const FLAT_SPREAD: f32 = 0.30;

pub const LETTERS: &[(&str, fn(&HandPose) -> bool)] = &[
    ("A", a),
    ("B", b),
    ("C", c),
    ("D", d),
    ("E", e),
    ("F", f),
    ("G", g),
    ("H", h),
    ("I", i),
    ("J", j),
    ("K", k),
    ("L", l),
    ("M", m),
    ("N", n),
    ("O", o),
    ("P", p),
    ("Q", q),
    ("R", r),
    ("S", s),
    ("T", t),
    ("U", u),
    ("V", v),
    ("W", w),
    ("X", x),
    ("Y", y),
    ("Z", z),
];

pub fn recognize(pose: &HandPose) -> Option<&'static str> {
    LETTERS
        .iter()
        .find(|(_, matches)| matches(pose))
        .map(|(label, _)| *label)
}

/// Thumb tucked under curled fingers, tip showing above the knuckles.
fn thumb_tucked(p: &HandPose) -> bool {
    p.all_curled(&Finger::FOUR) && !p.is_extended(Thumb) && p.thumb_above_knuckles()
}

fn a(p: &HandPose) -> bool {
    thumb_tucked(p) && !p.thumb_between(INDEX_MCP, PINKY_MCP)
}

fn b(p: &HandPose) -> bool {
    p.only_extended(&Finger::FOUR) && p.four_spread() < FLAT_SPREAD
}

fn c(p: &HandPose) -> bool {
    p.is_extended(Thumb) && p.all_hooked(&Finger::FOUR) && !p.tips_touch(Thumb, Index)
}

fn d(p: &HandPose) -> bool {
    p.only_extended(&[Index]) && p.tips_touch(Thumb, Middle)
}

fn e(p: &HandPose) -> bool {
    p.all_hooked(&Finger::FOUR) && !p.is_extended(Thumb) && !p.tips_touch(Thumb, Index)
}

fn f(p: &HandPose) -> bool {
    p.only_extended(&[Middle, Ring, Pinky])
        && p.tips_touch(Thumb, Index)
        && !p.is_hooked(Index)
}

fn g(p: &HandPose) -> bool {
    p.only_extended(&[Thumb])
        && p.is_horizontal(Index)
        && p.is_horizontal(Thumb)
        && p.all_curled(&[Middle, Ring, Pinky])
}

fn h(p: &HandPose) -> bool {
    p.all_horizontal(&[Index, Middle])
        && p.all_curled(&[Ring, Pinky])
        && !p.is_extended(Thumb)
}

fn i(p: &HandPose) -> bool {
    p.only_extended(&[Pinky])
}

fn j(p: &HandPose) -> bool {
    p.is_horizontal(Pinky) && p.all_curled(&[Index, Middle, Ring]) && !p.is_extended(Thumb)
}

fn k(p: &HandPose) -> bool {
    p.only_extended(&[Thumb, Index, Middle]) && p.thumb_up() && !p.tips_touch(Thumb, Index)
}

fn l(p: &HandPose) -> bool {
    p.only_extended(&[Thumb, Index]) && p.is_horizontal(Thumb)
}

fn m(p: &HandPose) -> bool {
    thumb_tucked(p) && p.thumb_between(RING_MCP, PINKY_MCP)
}

fn n(p: &HandPose) -> bool {
    thumb_tucked(p) && p.thumb_between(MIDDLE_MCP, RING_MCP)
}

fn o(p: &HandPose) -> bool {
    p.all_hooked(&Finger::FOUR) && p.tips_touch(Thumb, Index)
}

fn p(p: &HandPose) -> bool {
    p.all_point_down(&[Index, Middle]) && !p.points_down(Ring) && !p.points_down(Pinky)
}

fn q(p: &HandPose) -> bool {
    p.points_down(Index) && !p.points_down(Middle) && !p.points_down(Ring)
}

fn r(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle]) && p.crossed(Index, Middle)
}

fn s(p: &HandPose) -> bool {
    p.all_curled(&Finger::FOUR)
        && !p.is_extended(Thumb)
        && !p.thumb_above_knuckles()
        && p.thumb_between(RING_MCP, PINKY_MCP)
}

fn t(p: &HandPose) -> bool {
    thumb_tucked(p) && p.thumb_between(INDEX_MCP, MIDDLE_MCP)
}

fn u(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle])
        && p.is_folded(Thumb)
        && p.tip_distance(Index, Middle) < TOGETHER
}

fn v(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle])
        && p.is_folded(Thumb)
        && p.tip_distance(Index, Middle) >= TOGETHER
}

fn w(p: &HandPose) -> bool {
    p.only_extended(&[Index, Middle, Ring]) && !p.tips_touch(Thumb, Pinky)
}

fn x(p: &HandPose) -> bool {
    p.is_hooked(Index) && p.all_curled(&[Middle, Ring, Pinky]) && !p.is_extended(Thumb)
}

fn y(p: &HandPose) -> bool {
    p.only_extended(&[Thumb, Pinky])
}

fn z(p: &HandPose) -> bool {
    p.only_extended(&[Index]) && p.is_folded(Thumb) && p.lean(Index) >= POINT_LEAN
}
