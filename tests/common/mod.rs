//! In-memory page used by the integration tests
#![allow(dead_code)]

use browser_agent::dom::{IdAssignment, RawElement, RawPage, Viewport};
use browser_agent::error::{AgentError, Result};
use browser_agent::page::{DomEvent, PageDriver};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Document {
    title: String,
    elements: Vec<RawElement>,
}

#[derive(Debug, Default)]
struct State {
    url: String,
    injected: bool,
    /// agent ID to candidate index for the current document
    tagged: HashMap<String, usize>,
    values: HashMap<String, String>,
    checked: HashMap<String, bool>,
    focus_editable: bool,
    dictated: Vec<String>,
    calls: Vec<String>,
    navigations: Vec<String>,
}

/// A scripted site: each URL maps to a fixed document
pub struct FakePage {
    tab_id: String,
    site: HashMap<String, Document>,
    injectable: bool,
    state: Mutex<State>,
}

impl FakePage {
    pub fn new(start_url: &str) -> Self {
        Self {
            tab_id: "tab-1".to_string(),
            site: HashMap::new(),
            injectable: true,
            state: Mutex::new(State {
                url: start_url.to_string(),
                ..Default::default()
            }),
        }
    }

    /// Builder method: serve `elements` at `url`
    pub fn with_page(mut self, url: &str, title: &str, elements: Vec<RawElement>) -> Self {
        self.site.insert(
            url.to_string(),
            Document {
                title: title.to_string(),
                elements,
            },
        );
        self
    }

    pub fn with_tab_id(mut self, tab_id: &str) -> Self {
        self.tab_id = tab_id.to_string();
        self
    }

    /// Builder method: make script injection silently fail
    pub fn refusing_injection(mut self) -> Self {
        self.injectable = false;
        self
    }

    /// Builder method: give focus to an editable element
    pub fn with_editable_focus(self) -> Self {
        self.lock().focus_editable = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    pub fn current_url(&self) -> String {
        self.lock().url.clone()
    }

    pub fn value(&self, id: &str) -> Option<String> {
        self.lock().values.get(id).cloned()
    }

    pub fn is_checked(&self, id: &str) -> Option<bool> {
        self.lock().checked.get(id).copied()
    }

    pub fn dictated(&self) -> Vec<String> {
        self.lock().dictated.clone()
    }

    pub fn injected(&self) -> bool {
        self.lock().injected
    }

    /// Record an element operation, failing for IDs not tagged in this document
    fn touch(&self, op: &str, id: &str) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        if !state.tagged.contains_key(id) {
            return Err(AgentError::ElementNotFound(id.to_string()));
        }
        state.calls.push(format!("{} {}", op, id));
        Ok(state)
    }
}

impl PageDriver for FakePage {
    fn tab_id(&self) -> String {
        self.tab_id.clone()
    }

    fn url(&self) -> Result<String> {
        Ok(self.lock().url.clone())
    }

    fn ping(&self) -> Result<bool> {
        Ok(self.lock().injected)
    }

    fn inject(&self) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("inject".to_string());
        state.injected = self.injectable;
        Ok(())
    }

    fn collect(&self) -> Result<RawPage> {
        let state = self.lock();
        if !state.injected {
            return Err(AgentError::ScriptFailed("agent runtime not injected".to_string()));
        }

        let document = self.site.get(&state.url);
        Ok(RawPage {
            url: state.url.clone(),
            title: document.map(|d| d.title.clone()).unwrap_or_default(),
            timestamp: 1_700_000_000_000,
            viewport: Viewport {
                width: 1280.0,
                height: 800.0,
            },
            elements: document.map(|d| d.elements.clone()).unwrap_or_default(),
        })
    }

    fn tag(&self, assignments: &[IdAssignment]) -> Result<()> {
        let mut state = self.lock();
        state.tagged = assignments.iter().map(|a| (a.id.clone(), a.candidate)).collect();
        Ok(())
    }

    fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.lock().tagged.contains_key(id))
    }

    fn scroll_into_view(&self, id: &str) -> Result<()> {
        self.touch("scroll_into_view", id).map(drop)
    }

    fn highlight(&self, id: &str, _duration: Duration) -> Result<()> {
        self.touch("highlight", id).map(drop)
    }

    fn click(&self, id: &str) -> Result<()> {
        self.touch("click", id).map(drop)
    }

    fn focus(&self, id: &str) -> Result<()> {
        self.touch("focus", id).map(drop)
    }

    fn clear_value(&self, id: &str) -> Result<()> {
        let mut state = self.touch("clear_value", id)?;
        state.values.insert(id.to_string(), String::new());
        Ok(())
    }

    fn insert_text(&self, id: &str, text: &str) -> Result<()> {
        let mut state = self.touch("insert_text", id)?;
        state.values.entry(id.to_string()).or_default().push_str(text);
        Ok(())
    }

    fn dispatch(&self, id: &str, event: DomEvent) -> Result<()> {
        self.touch(&format!("dispatch:{}", event.as_str()), id).map(drop)
    }

    fn set_value(&self, id: &str, value: &str) -> Result<()> {
        let mut state = self.touch("set_value", id)?;
        state.values.insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn set_checked(&self, id: &str, checked: bool) -> Result<()> {
        let mut state = self.touch("set_checked", id)?;
        state.checked.insert(id.to_string(), checked);
        Ok(())
    }

    fn scroll_window(&self, delta_y: f64) -> Result<()> {
        self.lock().calls.push(format!("scroll_window {}", delta_y));
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(format!("navigate {}", url));
        state.navigations.push(url.to_string());
        state.url = url.to_string();
        // A new document loses the runtime and every tag
        state.injected = false;
        state.tagged.clear();
        Ok(())
    }

    fn wait_for_load(&self) -> Result<()> {
        Ok(())
    }

    fn insert_at_focus(&self, text: &str) -> Result<bool> {
        let mut state = self.lock();
        if !state.focus_editable {
            return Ok(false);
        }
        state.dictated.push(text.to_string());
        Ok(true)
    }
}

pub fn button(candidate: usize, text: &str) -> RawElement {
    RawElement::new(candidate, "button").with_text(text)
}

pub fn link(candidate: usize, text: &str, href: &str) -> RawElement {
    RawElement::new(candidate, "a").with_attribute("href", href).with_text(text)
}

pub fn text_input(candidate: usize, placeholder: &str) -> RawElement {
    RawElement::new(candidate, "input")
        .with_attribute("type", "text")
        .with_attribute("placeholder", placeholder)
}

pub fn checkbox(candidate: usize, label: &str) -> RawElement {
    RawElement::new(candidate, "input")
        .with_attribute("type", "checkbox")
        .with_accessible_name(label)
        .with_checked(false)
}

pub fn select(candidate: usize, label: &str) -> RawElement {
    RawElement::new(candidate, "select").with_accessible_name(label)
}
