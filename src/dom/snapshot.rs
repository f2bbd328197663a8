use crate::dom::element::{ElementRecord, RawElement};
use serde::{Deserialize, Serialize};

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Pruned, labeled view of a page's interactive elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,

    /// Milliseconds since the Unix epoch, as reported by the page
    pub timestamp: u64,

    pub viewport: Viewport,

    /// Elements in document order
    pub elements: Vec<ElementRecord>,
}

impl PageSnapshot {
    /// Find an element by its agent ID
    pub fn find(&self, id: &str) -> Option<&ElementRecord> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Convert the snapshot to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Unfiltered page data collected by the page runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub timestamp: u64,

    #[serde(default)]
    pub viewport: Viewport,

    #[serde(default)]
    pub elements: Vec<RawElement>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::element::ElementType;

    #[test]
    fn test_find() {
        let snapshot = PageSnapshot {
            url: "https://example.com".to_string(),
            elements: vec![
                ElementRecord::new("agent-0", ElementType::Link, "Home"),
                ElementRecord::new("agent-1", ElementType::Button, "Save"),
            ],
            ..Default::default()
        };

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.find("agent-1").map(|e| e.label.as_str()), Some("Save"));
        assert!(snapshot.find("agent-2").is_none());
    }

    #[test]
    fn test_raw_page_tolerates_missing_fields() {
        let raw: RawPage = serde_json::from_str(r#"{"url": "about:blank"}"#).unwrap();
        assert_eq!(raw.url, "about:blank");
        assert!(raw.elements.is_empty());
    }
}
