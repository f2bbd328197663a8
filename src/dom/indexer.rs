//! Element indexer
//!
//! Turns the raw candidate list collected by the page runtime into a
//! [`PageSnapshot`]: invisible and unlabeled candidates are dropped, survivors
//! are classified and receive a fresh `agent-<n>` ID, and the IDs are written
//! back into the page so the executor can find the elements again.

use crate::dom::element::{ElementRecord, ElementType, RawElement};
use crate::dom::id_map::{IdAssignment, IdMap};
use crate::dom::snapshot::{PageSnapshot, RawPage, Viewport};
use crate::error::Result;
use crate::page::PageDriver;

/// Distance in pixels an element may sit outside the viewport and still count as visible
pub const VIEWPORT_BUFFER: f64 = 100.0;

/// Maximum characters of visible text used as a label
pub const MAX_TEXT_LABEL: usize = 100;

/// Maximum characters of a value used as a label
pub const MAX_VALUE_LABEL: usize = 50;

const INTERACTIVE_TAGS: [&str; 4] = ["button", "input", "select", "textarea"];

const INTERACTIVE_ROLES: [&str; 7] = ["button", "link", "textbox", "checkbox", "radio", "menuitem", "tab"];

/// Check whether an element belongs to the interactive candidate set
pub fn is_candidate(element: &RawElement) -> bool {
    if element.is_tag("a") && element.attribute("href").is_some() {
        return true;
    }

    if INTERACTIVE_TAGS.iter().any(|&tag| element.is_tag(tag)) {
        return true;
    }

    if element.role().is_some_and(|role| INTERACTIVE_ROLES.contains(&role.as_str())) {
        return true;
    }

    if element.attribute("onclick").is_some() {
        return true;
    }

    element.attribute("tabindex").is_some_and(|t| t.trim() != "-1")
}

/// Check whether an element is rendered and near the viewport
pub fn is_visible(element: &RawElement, viewport: &Viewport) -> bool {
    let style = &element.style;
    if style.display.trim() == "none" || style.visibility.trim() == "hidden" {
        return false;
    }

    if style.opacity.trim().parse::<f64>().is_ok_and(|o| o == 0.0) {
        return false;
    }

    element.rect.has_area() && element.rect.overlaps_viewport(viewport.width, viewport.height, VIEWPORT_BUFFER)
}

/// Derive a human-meaningful label, or `None` when the element has nothing to say
pub fn derive_label(element: &RawElement) -> Option<String> {
    let attributes = ["title", "placeholder", "alt", "name"];

    let named = element
        .accessible_name
        .as_deref()
        .into_iter()
        .chain(attributes.iter().filter_map(|key| element.attribute(key)))
        .map(str::trim)
        .find(|s| !s.is_empty());

    if let Some(label) = named {
        return Some(label.to_string());
    }

    let text = collapse_whitespace(&element.text);
    if !text.is_empty() {
        return Some(truncate_chars(&text, MAX_TEXT_LABEL));
    }

    element
        .value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| truncate_chars(v, MAX_VALUE_LABEL))
}

/// Classify an element following a fixed precedence table
pub fn classify(element: &RawElement) -> ElementType {
    let role = element.role();
    let role = role.as_deref();

    if element.is_tag("a") {
        return ElementType::Link;
    }

    if element.is_tag("button") || role == Some("button") {
        return ElementType::Button;
    }

    if element.is_tag("input") {
        return match element.input_type().as_str() {
            "submit" | "button" => ElementType::Button,
            "checkbox" => ElementType::Checkbox,
            "radio" => ElementType::Radio,
            _ => ElementType::Input,
        };
    }

    if element.is_tag("select") {
        return ElementType::Select;
    }

    if element.is_tag("textarea") {
        return ElementType::Textarea;
    }

    match role {
        Some("textbox") => ElementType::Input,
        Some("menuitem") => ElementType::Menuitem,
        Some("tab") => ElementType::Tab,
        _ => ElementType::Interactive,
    }
}

/// Checked state: native for checkbox/radio inputs, otherwise from `aria-checked`
fn checked_state(element: &RawElement) -> Option<bool> {
    if element.checked.is_some() {
        return element.checked;
    }

    match element.attribute("aria-checked").map(str::trim) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Result of indexing one raw page
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPage {
    pub snapshot: PageSnapshot,
    pub ids: IdMap,
}

impl IndexedPage {
    /// ID assignments to write back into the page
    pub fn assignments(&self) -> Vec<IdAssignment> {
        self.ids.assignments()
    }
}

/// Scans a page and produces labeled snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct Indexer;

impl Indexer {
    pub fn new() -> Self {
        Self
    }

    /// Filter, label, classify and number the raw candidates
    pub fn index(&self, raw: RawPage) -> IndexedPage {
        let mut ids = IdMap::new();
        let mut elements = Vec::new();

        for element in &raw.elements {
            if !is_candidate(element) || !is_visible(element, &raw.viewport) {
                continue;
            }

            let Some(label) = derive_label(element) else {
                continue;
            };

            let id = ids.register(element.candidate);
            elements.push(ElementRecord {
                id,
                element_type: classify(element),
                tag: element.tag.clone(),
                label,
                value: element.value.clone(),
                checked: checked_state(element),
                disabled: element.disabled || element.attribute("aria-disabled") == Some("true"),
                position: element.rect.center(),
            });
        }

        log::debug!(
            "Indexed {} of {} candidates on {}",
            elements.len(),
            raw.elements.len(),
            raw.url
        );

        IndexedPage {
            snapshot: PageSnapshot {
                url: raw.url,
                title: raw.title,
                timestamp: raw.timestamp,
                viewport: raw.viewport,
                elements,
            },
            ids,
        }
    }

    /// Collect, index and tag the live page
    pub fn scan(&self, driver: &dyn PageDriver) -> Result<PageSnapshot> {
        let raw = driver.collect()?;
        let indexed = self.index(raw);
        driver.tag(&indexed.assignments())?;
        Ok(indexed.snapshot)
    }
}
