//! Spoken punctuation for dictated text

use once_cell::sync::Lazy;
use regex::Regex;

/// Spoken forms and their replacements, longest phrases first
static SUBSTITUTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\s*\bnew\s*line\b\s*", "\n"),
        (r"(?i)\s*\bquestion mark\b", "?"),
        (r"(?i)\s*\bexclamation mark\b", "!"),
        (r"(?i)\s*\bperiod\b", "."),
        (r"(?i)\s*\bcomma\b", ","),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid dictation pattern"), replacement))
    .collect()
});

/// Replace spoken punctuation with the symbols it names
pub fn apply_spoken_punctuation(text: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}
