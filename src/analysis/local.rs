//! Offline interpretation of buffered labels.
//!
//! Known label runs map to canned sentences. Localized labels are mapped back
//! to their canonical form first so the same patterns work for every language.

use crate::lexicon;
use crate::settings::Language;

/// Label runs and their canned sentences, longest first.
const PATTERNS: &[(&[&str], &str)] = &[
    (&["I", "Love", "You"], "I love you."),
    (&["Hello", "How are you?"], "Hello, how are you?"),
    (&["Please", "Help"], "Please help me."),
    (&["Help", "Please"], "Please help me."),
    (&["More", "Water"], "More water, please."),
    (&["Thank You", "Help"], "Thank you for your help."),
    (&["Sorry", "Please"], "Sorry, please forgive me."),
];

/// Minimum labels for the generic "check ordering" hint.
pub const MIN_UNMATCHED_LABELS: usize = 3;

/// Interprets `labels` without a language model.
pub fn interpret(labels: &[String], language: Language) -> Option<String> {
    let canonical: Vec<_> = labels
        .iter()
        .map(|l| lexicon::normalize(l, language))
        .collect();

    for (pattern, sentence) in PATTERNS {
        let found = canonical
            .windows(pattern.len())
            .any(|window| window.iter().zip(pattern.iter()).all(|(a, b)| a == b));
        if found {
            return Some((*sentence).to_string());
        }
    }

    if labels.len() >= MIN_UNMATCHED_LABELS {
        Some(format!("{} signs detected, check ordering", labels.len()))
    } else {
        None
    }
}
