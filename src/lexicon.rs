//! Vocabulary mapper: canonical labels to per-language glosses.
//!
//! Canonical labels are the ASL-oriented names the classifier produces.
//! Tables are static; anything without an entry passes through unchanged.

use crate::settings::Language;
use std::borrow::Cow;

const KSL: &[(&str, &str)] = &[
    ("Hello", "안녕하세요"),
    ("Thank You", "감사합니다"),
    ("Please", "부탁합니다"),
    ("Sorry", "미안합니다"),
    ("Help", "도와주세요"),
    ("Good", "좋다"),
    ("Bad", "나쁘다"),
    ("Love", "사랑"),
    ("I Love You", "사랑해요"),
    ("You", "당신"),
    ("I", "나"),
    ("Yes", "네"),
    ("No", "아니요"),
    ("Water", "물"),
    ("More", "더"),
    ("Stop", "멈춰"),
    ("Finish", "끝"),
    ("How are you?", "어떻게 지내세요?"),
    ("Promise", "약속"),
    ("Fist", "주먹"),
    ("Point", "가리키기"),
    ("Peace", "평화"),
    ("Open Hand", "손바닥"),
];

const BSL: &[(&str, &str)] = &[
    ("Hello", "Hiya"),
    ("Thank You", "Cheers"),
    ("Finish", "Finished"),
    ("Open Hand", "Flat Hand"),
    ("Peace", "V Sign"),
    ("Point", "Index"),
    ("I Love You", "Love You"),
    ("More", "More Please"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Asl => &[],
        Language::Ksl => KSL,
        Language::Bsl => BSL,
    }
}

/// Maps a canonical label into `language` without allocating.
///
/// Borrows the static gloss when one exists, otherwise `label` itself.
pub fn localize_cow(label: &str, language: Language) -> Cow<'_, str> {
    match table(language).iter().find(|(canonical, _)| *canonical == label) {
        Some((_, gloss)) => Cow::Borrowed(*gloss),
        None => Cow::Borrowed(label),
    }
}

/// Maps a canonical label into `language`.
pub fn localize(label: &str, language: Language) -> String {
    localize_cow(label, language).into_owned()
}

/// Reverse lookup: the canonical label for a gloss, if the gloss is in the table.
pub fn canonical(gloss: &str, language: Language) -> Option<&'static str> {
    table(language)
        .iter()
        .find(|(_, g)| *g == gloss)
        .map(|(canonical, _)| *canonical)
}

/// Canonical form of a possibly localized label.
///
/// `language` is searched first, then every other table, so glosses buffered
/// before a language switch still resolve.
pub fn normalize<'a>(label: &'a str, language: Language) -> Cow<'a, str> {
    let found = canonical(label, language).or_else(|| {
        Language::ALL
            .into_iter()
            .filter(|other| *other != language)
            .find_map(|other| canonical(label, other))
    });
    match found {
        Some(c) => Cow::Borrowed(c),
        None => Cow::Borrowed(label),
    }
}

/// Re-expresses a label from any language in `language`.
pub fn relocalize(label: &str, language: Language) -> String {
    localize(&normalize(label, language), language)
}
