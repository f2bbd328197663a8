use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Interactive element classification exposed to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Link,
    Button,
    Input,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Menuitem,
    Tab,
    Interactive,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Link => "link",
            ElementType::Button => "button",
            ElementType::Input => "input",
            ElementType::Textarea => "textarea",
            ElementType::Select => "select",
            ElementType::Checkbox => "checkbox",
            ElementType::Radio => "radio",
            ElementType::Menuitem => "menuitem",
            ElementType::Tab => "tab",
            ElementType::Interactive => "interactive",
        }
    }
}

/// Viewport-relative center point of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One interactive element visible at scrape time.
///
/// `id` is only meaningful within the scrape that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Ephemeral ID in the form `agent-<n>`
    pub id: String,

    #[serde(rename = "type")]
    pub element_type: ElementType,

    /// Lowercase HTML tag name
    pub tag: String,

    /// Human-meaningful label, never empty
    pub label: String,

    pub value: Option<String>,

    /// Checked state for checkable elements, `None` when not applicable or mixed
    pub checked: Option<bool>,

    #[serde(default)]
    pub disabled: bool,

    pub position: Position,
}

impl ElementRecord {
    /// Create a record with the given ID, type and label
    pub fn new(id: impl Into<String>, element_type: ElementType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element_type,
            tag: String::new(),
            label: label.into(),
            value: None,
            checked: None,
            disabled: false,
            position: Position::default(),
        }
    }

    /// Builder method: set tag name
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Builder method: mark as disabled
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Bounding box coordinates for an element, relative to the viewport
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the bounding box has non-zero dimensions
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Check if any part of the box lies within the viewport grown by `buffer` on every side
    pub fn overlaps_viewport(&self, width: f64, height: f64, buffer: f64) -> bool {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        !(bottom < -buffer || right < -buffer || self.y > height + buffer || self.x > width + buffer)
    }

    pub fn center(&self) -> Position {
        Position {
            x: (self.x + self.width / 2.0).round(),
            y: (self.y + self.height / 2.0).round(),
        }
    }
}

/// Computed style properties relevant to visibility
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: "1".to_string(),
        }
    }
}

/// A candidate element as collected by the page runtime, before filtering
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    /// Position of the element in the page runtime's candidate list
    pub candidate: usize,

    /// Lowercase HTML tag name
    pub tag: String,

    /// Attributes relevant to classification and labelling
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// aria-label, aria-labelledby text or associated label text
    #[serde(default)]
    pub accessible_name: Option<String>,

    /// Rendered inner text
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub value: Option<String>,

    /// Native checked state of checkbox and radio inputs
    #[serde(default)]
    pub checked: Option<bool>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub style: ComputedStyle,

    #[serde(default)]
    pub rect: BoundingBox,
}

impl RawElement {
    /// Create a raw element with a visible default box
    pub fn new(candidate: usize, tag: impl Into<String>) -> Self {
        Self {
            candidate,
            tag: tag.into().to_ascii_lowercase(),
            rect: BoundingBox::new(10.0, 10.0, 100.0, 30.0),
            ..Default::default()
        }
    }

    /// Builder method: add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set inner text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder method: set accessible name
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name = Some(name.into());
        self
    }

    /// Builder method: set current value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Builder method: set bounding box
    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = BoundingBox::new(x, y, width, height);
        self
    }

    /// Builder method: set computed style
    pub fn with_style(mut self, display: &str, visibility: &str, opacity: &str) -> Self {
        self.style = ComputedStyle {
            display: display.to_string(),
            visibility: visibility.to_string(),
            opacity: opacity.to_string(),
        };
        self
    }

    /// Builder method: set checked state
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Builder method: mark as disabled
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Get attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Lowercase `role` attribute
    pub fn role(&self) -> Option<String> {
        self.attribute("role").map(|r| r.trim().to_ascii_lowercase())
    }

    /// Lowercase `type` attribute, defaulting to `text` for inputs
    pub fn input_type(&self) -> String {
        self.attribute("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string())
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_serialization() {
        assert_eq!(serde_json::to_string(&ElementType::Menuitem).unwrap(), "\"menuitem\"");
        assert_eq!(serde_json::to_string(&ElementType::Textarea).unwrap(), "\"textarea\"");
        assert_eq!(ElementType::Interactive.as_str(), "interactive");
    }

    #[test]
    fn test_record_wire_format() {
        let record = ElementRecord::new("agent-3", ElementType::Button, "Submit").with_tag("button");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "agent-3");
        assert_eq!(json["type"], "button");
        assert_eq!(json["label"], "Submit");
        assert!(json["value"].is_null());
        assert!(json["checked"].is_null());
        assert_eq!(json["position"]["x"], 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert!(bbox.has_area());
        assert_eq!(bbox.center(), Position { x: 60.0, y: 45.0 });

        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 10.0).has_area());
        assert!(!BoundingBox::new(0.0, 0.0, 10.0, 0.0).has_area());
    }

    #[test]
    fn test_viewport_overlap_with_buffer() {
        // just below the fold but inside the buffer
        assert!(BoundingBox::new(0.0, 850.0, 50.0, 20.0).overlaps_viewport(1280.0, 800.0, 100.0));
        // far below the fold
        assert!(!BoundingBox::new(0.0, 1000.0, 50.0, 20.0).overlaps_viewport(1280.0, 800.0, 100.0));
        // above the top edge beyond the buffer
        assert!(!BoundingBox::new(0.0, -200.0, 50.0, 20.0).overlaps_viewport(1280.0, 800.0, 100.0));
        // left of the viewport within the buffer
        assert!(BoundingBox::new(-120.0, 10.0, 50.0, 20.0).overlaps_viewport(1280.0, 800.0, 100.0));
    }

    #[test]
    fn test_raw_element_from_page_json() {
        let json = serde_json::json!({
            "candidate": 4,
            "tag": "input",
            "attributes": {"type": "Checkbox", "name": "remember"},
            "accessibleName": null,
            "text": "",
            "checked": true,
            "style": {"display": "inline-block", "visibility": "visible", "opacity": "1"},
            "rect": {"x": 1.0, "y": 2.0, "width": 13.0, "height": 13.0}
        });

        let raw: RawElement = serde_json::from_value(json).unwrap();
        assert_eq!(raw.candidate, 4);
        assert_eq!(raw.input_type(), "checkbox");
        assert_eq!(raw.checked, Some(true));
        assert!(!raw.disabled);
        assert!(raw.value.is_none());
    }
}
