//! Prompt construction and completion cleanup.

use crate::settings::Language;

/// Builds the system prompt for interpreting a label sequence in `language`.
pub fn system_prompt(language: Language) -> String {
    format!(
        "You interpret sequences of recognized {} ({}) signs. \
         Reply with one short, natural sentence that a signer most likely meant. \
         Reply with the sentence only, without quotes or explanation.",
        language.display_name(),
        language.code()
    )
}

/// Builds the user prompt listing the labels in order.
pub fn user_prompt(labels: &[String]) -> String {
    format!("Signs in order: {}", labels.join(", "))
}

/// Cleans a raw completion into a sentence; `None` when nothing usable remains.
pub fn parse_completion(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line
        .strip_prefix("Sentence:")
        .map(str::trim_start)
        .unwrap_or(line);
    let cleaned = line.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
