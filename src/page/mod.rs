//! Page-side plumbing
//!
//! [`PageDriver`] is the seam between Rust and a live document. The indexer and
//! the action executor only ever touch the page through it, which keeps them
//! independent of the browser backend. [`ChromePage`] implements it for a
//! `headless_chrome` tab; [`ContentScript`] answers the request/response
//! message set on top of a driver.

pub mod chrome;
pub mod content_script;
pub mod dictation;

pub use chrome::ChromePage;
pub use content_script::{ContentScript, PageRequest, PageResponse};

use crate::dom::{IdAssignment, RawPage};
use crate::error::Result;
use std::time::Duration;

/// Events fired after programmatic value changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Input,
    Change,
    Blur,
}

impl DomEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
            DomEvent::Blur => "blur",
        }
    }
}

/// Primitive operations against one live document.
///
/// Element arguments are agent IDs from the most recent [`PageDriver::tag`]
/// call; operations on an unknown ID fail with
/// [`AgentError::ElementNotFound`](crate::error::AgentError::ElementNotFound).
pub trait PageDriver: Send + Sync {
    /// Stable identity of the tab hosting the document
    fn tab_id(&self) -> String;

    /// Current top-level URL
    fn url(&self) -> Result<String>;

    /// Readiness probe: is the page runtime installed?
    fn ping(&self) -> Result<bool>;

    /// Install the page runtime
    fn inject(&self) -> Result<()>;

    /// Collect raw interactive candidates
    fn collect(&self) -> Result<RawPage>;

    /// Write agent IDs onto collected candidates, clearing any previous ones
    fn tag(&self, assignments: &[IdAssignment]) -> Result<()>;

    fn contains(&self, id: &str) -> Result<bool>;

    /// Scroll the element to the center of the viewport
    fn scroll_into_view(&self, id: &str) -> Result<()>;

    /// Outline the element for `duration`, then restore its previous outline
    fn highlight(&self, id: &str, duration: Duration) -> Result<()>;

    fn click(&self, id: &str) -> Result<()>;

    fn focus(&self, id: &str) -> Result<()>;

    /// Empty an input, textarea or editable region
    fn clear_value(&self, id: &str) -> Result<()>;

    /// Insert text using the most framework-compatible mechanism available
    fn insert_text(&self, id: &str, text: &str) -> Result<()>;

    fn dispatch(&self, id: &str, event: DomEvent) -> Result<()>;

    fn set_value(&self, id: &str, value: &str) -> Result<()>;

    fn set_checked(&self, id: &str, checked: bool) -> Result<()>;

    /// Smooth-scroll the window vertically; negative values scroll up
    fn scroll_window(&self, delta_y: f64) -> Result<()>;

    /// Navigate the top-level document
    fn navigate(&self, url: &str) -> Result<()>;

    /// Block until the current navigation has finished loading
    fn wait_for_load(&self) -> Result<()>;

    /// Insert text into the focused editable element; `false` if nothing editable has focus
    fn insert_at_focus(&self, text: &str) -> Result<bool>;
}
