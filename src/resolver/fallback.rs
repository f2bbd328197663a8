//! Deterministic intent matcher used when no reasoning service answers.
//!
//! Rules are independent and additive: every rule that matches the intent
//! appends its actions, in rule order. Only when no rule produced anything is
//! the whole intent tried as a click target.

use crate::actions::{Action, ScrollDirection};
use crate::dom::{ElementRecord, ElementType, PageSnapshot};
use once_cell::sync::Lazy;
use regex::Regex;

static CLICK_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bclick\s+(?:on\s+)?(?:the\s+)?(.+)").expect("valid click rule"));

static TYPE_RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:type|enter|input)\s+(.+?)\s+in(?:to)?\s+(?:the\s+)?(.+)").expect("valid type rule")
});

static LOGIN_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)login|sign in").expect("valid login rule"));

static SEARCH_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bsearch\s+(?:for\s+)?(.+)").expect("valid search rule"));

static SCROLL_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)scroll").expect("valid scroll rule"));

static UP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bup").expect("valid direction rule"));

const LOGIN_QUERY: &str = "login sign in submit";
const SEARCH_FIELD_QUERY: &str = "search query";
const SEARCH_BUTTON_QUERY: &str = "search submit go";

const CLICKABLE: &[ElementType] = &[ElementType::Button, ElementType::Link, ElementType::Interactive];
const TEXT_ENTRY: &[ElementType] = &[ElementType::Input, ElementType::Textarea];
const LOGIN_TARGETS: &[ElementType] = &[ElementType::Button, ElementType::Link];

/// Rule-ordered pattern matcher over a page snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResolver;

impl FallbackResolver {
    pub fn new() -> Self {
        Self
    }

    /// Turn an intent into actions against the given snapshot
    pub fn resolve(&self, intent: &str, snapshot: &PageSnapshot) -> Vec<Action> {
        let elements = &snapshot.elements;
        let mut actions = Vec::new();

        if let Some(caps) = CLICK_RULE.captures(intent) {
            let target = clean_capture(&caps[1]);
            if let Some(element) = best_match(elements, target, CLICKABLE) {
                actions.push(Action::click(&element.id, format!("Click {}", element.label)));
            }
        }

        if let Some(caps) = TYPE_RULE.captures(intent) {
            let text = clean_capture(&caps[1]);
            let field = clean_capture(&caps[2]);
            if let Some(element) = best_match(elements, field, TEXT_ENTRY) {
                actions.push(Action::type_text(
                    &element.id,
                    text,
                    format!("Type \"{}\" into {}", text, element.label),
                ));
            }
        }

        if LOGIN_RULE.is_match(intent) {
            if let Some(element) = best_match(elements, LOGIN_QUERY, LOGIN_TARGETS) {
                actions.push(Action::click(&element.id, format!("Click {}", element.label)));
            }
        }

        if let Some(caps) = SEARCH_RULE.captures(intent) {
            let query = clean_capture(&caps[1]);
            if let Some(field) = best_match(elements, SEARCH_FIELD_QUERY, &[ElementType::Input]) {
                actions.push(Action::type_text(
                    &field.id,
                    query,
                    format!("Search for \"{}\"", query),
                ));
            }
            if let Some(button) = best_match(elements, SEARCH_BUTTON_QUERY, &[ElementType::Button]) {
                actions.push(Action::click(&button.id, format!("Click {}", button.label)));
            }
        }

        if SCROLL_RULE.is_match(intent) {
            let direction = if UP.is_match(intent) {
                ScrollDirection::Up
            } else {
                ScrollDirection::Down
            };
            actions.push(Action::scroll(direction, format!("Scroll {}", direction.as_str())));
        }

        if actions.is_empty() {
            if let Some(element) = best_match(elements, intent.trim(), &[]) {
                actions.push(Action::click(&element.id, format!("Click {}", element.label)));
            }
        }

        log::debug!("Fallback resolved {:?} to {} action(s)", intent, actions.len());
        actions
    }
}

/// Strip surrounding quotes and trailing sentence punctuation from a captured phrase
fn clean_capture(raw: &str) -> &str {
    raw.trim()
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .trim_matches(['"', '\''])
        .trim()
}

/// Score an element label against a query.
///
/// Each query word found inside the lowercase label adds its length. Preferred
/// types get a 1.5x boost and an exact full-query label doubles the score.
pub fn score(element: &ElementRecord, query: &str, preferred: &[ElementType]) -> f64 {
    let label = element.label.to_lowercase();
    let query = query.trim().to_lowercase();

    let mut score: f64 = query
        .split_whitespace()
        .filter(|word| label.contains(word))
        .map(|word| word.chars().count() as f64)
        .sum();

    if preferred.contains(&element.element_type) {
        score *= 1.5;
    }
    if label.trim() == query {
        score *= 2.0;
    }
    score
}

/// Highest scoring enabled element, first seen wins ties.
///
/// A non-empty `preferred` set restricts candidates to those types; an empty
/// set considers every element.
pub fn best_match<'a>(elements: &'a [ElementRecord], query: &str, preferred: &[ElementType]) -> Option<&'a ElementRecord> {
    let mut best: Option<(&ElementRecord, f64)> = None;

    for element in elements {
        if element.disabled {
            continue;
        }
        if !preferred.is_empty() && !preferred.contains(&element.element_type) {
            continue;
        }

        let score = score(element, query, preferred);
        if score <= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((element, score));
        }
    }

    best.map(|(element, _)| element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;

    fn snapshot(elements: Vec<ElementRecord>) -> PageSnapshot {
        PageSnapshot {
            elements,
            ..Default::default()
        }
    }

    fn target(action: &Action) -> &str {
        action.target_id().unwrap()
    }

    #[test]
    fn test_click_on_submit_button() {
        let page = snapshot(vec![
            ElementRecord::new("agent-0", ElementType::Link, "Home"),
            ElementRecord::new("agent-1", ElementType::Input, "Email"),
            ElementRecord::new("agent-2", ElementType::Link, "Help"),
            ElementRecord::new("agent-3", ElementType::Button, "Submit"),
        ]);

        let actions = FallbackResolver::new().resolve("click on the Submit button", &page);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name(), "CLICK");
        assert_eq!(target(&actions[0]), "agent-3");
    }

    #[test]
    fn test_search_types_then_clicks() {
        let page = snapshot(vec![
            ElementRecord::new("agent-0", ElementType::Link, "Deals"),
            ElementRecord::new("agent-1", ElementType::Input, "Search"),
            ElementRecord::new("agent-2", ElementType::Button, "Go"),
        ]);

        let actions = FallbackResolver::new().resolve("search for wireless mouse", &page);
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0].kind,
            ActionKind::Type {
                target_id: "agent-1".to_string(),
                value: "wireless mouse".to_string()
            }
        );
        assert_eq!(actions[1].kind, ActionKind::Click { target_id: "agent-2".to_string() });
    }

    #[test]
    fn test_type_into_field() {
        let page = snapshot(vec![
            ElementRecord::new("agent-0", ElementType::Input, "Email address"),
            ElementRecord::new("agent-1", ElementType::Textarea, "Message"),
        ]);

        let actions = FallbackResolver::new().resolve("type \"hello there\" into the message box", &page);
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].kind,
            ActionKind::Type {
                target_id: "agent-1".to_string(),
                value: "hello there".to_string()
            }
        );

        let actions = FallbackResolver::new().resolve("enter bob@example.com in email", &page);
        assert_eq!(target(&actions[0]), "agent-0");
    }

    #[test]
    fn test_login_rule() {
        let page = snapshot(vec![
            ElementRecord::new("agent-0", ElementType::Input, "Username"),
            ElementRecord::new("agent-1", ElementType::Button, "Sign in"),
        ]);

        let actions = FallbackResolver::new().resolve("please log me in, login now", &page);
        assert_eq!(actions.len(), 1);
        assert_eq!(target(&actions[0]), "agent-1");
    }

    #[test]
    fn test_rules_are_additive() {
        let page = snapshot(vec![
            ElementRecord::new("agent-0", ElementType::Button, "Login"),
            ElementRecord::new("agent-1", ElementType::Link, "Pricing"),
        ]);

        // Both the click rule and the login rule fire
        let actions = FallbackResolver::new().resolve("click the login button", &page);
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| target(a) == "agent-0"));
    }

    #[test]
    fn test_scroll_direction() {
        let page = snapshot(vec![]);

        let actions = FallbackResolver::new().resolve("scroll up a bit", &page);
        assert_eq!(actions.len(), 1);
        match &actions[0].kind {
            ActionKind::Scroll { options } => assert_eq!(options.direction, ScrollDirection::Up),
            other => panic!("unexpected action {:?}", other),
        }

        for intent in ["scroll upwards a bit", "Scroll upward"] {
            let actions = FallbackResolver::new().resolve(intent, &page);
            match &actions[0].kind {
                ActionKind::Scroll { options } => assert_eq!(options.direction, ScrollDirection::Up, "{}", intent),
                other => panic!("unexpected action {:?}", other),
            }
        }

        // "up" inside another word is not a direction
        let actions = FallbackResolver::new().resolve("scroll to the setup section", &page);
        match &actions[0].kind {
            ActionKind::Scroll { options } => assert_eq!(options.direction, ScrollDirection::Down),
            other => panic!("unexpected action {:?}", other),
        }

        let actions = FallbackResolver::new().resolve("Scroll down", &page);
        match &actions[0].kind {
            ActionKind::Scroll { options } => assert_eq!(options.direction, ScrollDirection::Down),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_last_resort_click_on_full_intent() {
        let page = snapshot(vec![
            ElementRecord::new("agent-0", ElementType::Checkbox, "Remember me"),
            ElementRecord::new("agent-1", ElementType::Link, "Pricing"),
        ]);

        let actions = FallbackResolver::new().resolve("pricing", &page);
        assert_eq!(actions.len(), 1);
        assert_eq!(target(&actions[0]), "agent-1");
    }

    #[test]
    fn test_no_match_yields_nothing() {
        let page = snapshot(vec![ElementRecord::new("agent-0", ElementType::Button, "Cancel")]);
        assert!(FallbackResolver::new().resolve("click the checkout link", &page).is_empty());
        assert!(FallbackResolver::new().resolve("zzz", &snapshot(vec![])).is_empty());
    }

    #[test]
    fn test_score() {
        let submit = ElementRecord::new("agent-0", ElementType::Button, "Submit order");
        assert_eq!(score(&submit, "submit", &[]), 6.0);
        assert_eq!(score(&submit, "submit", &[ElementType::Button]), 9.0);
        assert_eq!(score(&submit, "submit order", &[]), 22.0);
        assert_eq!(score(&submit, "Submit Order", &[ElementType::Button]), 33.0);
        assert_eq!(score(&submit, "cancel", &[]), 0.0);
    }

    #[test]
    fn test_best_match_skips_disabled() {
        let elements = vec![
            ElementRecord::new("agent-0", ElementType::Button, "Save").with_disabled(true),
            ElementRecord::new("agent-1", ElementType::Button, "Save draft"),
        ];
        let found = best_match(&elements, "save", &[ElementType::Button]).unwrap();
        assert_eq!(found.id, "agent-1");
    }

    #[test]
    fn test_best_match_ties_go_to_first() {
        let elements = vec![
            ElementRecord::new("agent-0", ElementType::Button, "Next page"),
            ElementRecord::new("agent-1", ElementType::Button, "Next step"),
        ];
        assert_eq!(best_match(&elements, "next", &[]).unwrap().id, "agent-0");
    }

    #[test]
    fn test_best_match_restricts_to_preferred_types() {
        let elements = vec![
            ElementRecord::new("agent-0", ElementType::Input, "Search"),
            ElementRecord::new("agent-1", ElementType::Button, "Go"),
        ];
        assert_eq!(best_match(&elements, "search submit go", &[ElementType::Button]).unwrap().id, "agent-1");
        assert_eq!(best_match(&elements, "search submit go", &[]).unwrap().id, "agent-0");
    }
}
