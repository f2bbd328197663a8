use once_cell::sync::Lazy;
use regex::Regex;

/// Verbs that mark a message as a request to act on the page
static ACTION_VERBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:click|type|search|scroll|open|fill|submit|select|press|enter|navigate|go to|check|log ?in|sign in)\b",
    )
    .expect("valid action verb pattern")
});

static POLITE_REQUEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcan you\b.*\b(?:click|find|open)\b").expect("valid request pattern"));

/// Keyword heuristic deciding whether a chat message asks for browser action.
///
/// Approximate by nature: "open question" counts as actionable.
pub fn is_actionable(text: &str) -> bool {
    ACTION_VERBS.is_match(text) || POLITE_REQUEST.is_match(text)
}
