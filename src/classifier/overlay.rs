//! Per-language signs that differ from the ASL reading of the same hand shape.

use crate::hand::HandPose;
use crate::hand::landmark::Finger;
use crate::lexicon;
use crate::settings::Language;

type Predicate = fn(&HandPose) -> bool;

const BSL: &[(&str, Predicate)] = &[("Good", thumbs_up), ("Bad", little_finger_up)];

const KSL: &[(&str, Predicate)] = &[("Good", thumbs_up), ("Promise", little_finger_up)];

fn thumbs_up(p: &HandPose) -> bool {
    p.only_extended(&[Finger::Thumb]) && p.thumb_up() && p.all_curled(&Finger::FOUR)
}

fn little_finger_up(p: &HandPose) -> bool {
    p.only_extended(&[Finger::Pinky])
}

/// Language-specific match, already localized. Always `None` for ASL.
pub fn recognize(pose: &HandPose, language: Language) -> Option<String> {
    let table = match language {
        Language::Asl => return None,
        Language::Bsl => BSL,
        Language::Ksl => KSL,
    };
    table
        .iter()
        .find(|(_, matches)| matches(pose))
        .map(|(label, _)| lexicon::localize(label, language))
}
