//! Typed browser actions and their execution
//!
//! An [`Action`] is one step of a plan. Its JSON form is the wire contract with
//! the reasoning service and the page-side executor:
//!
//! ```json
//! {"type": "TYPE", "targetId": "agent-4", "value": "wireless mouse", "description": "Fill search box"}
//! ```

pub mod check;
pub mod click;
pub mod executor;
pub mod open_url;
pub mod scroll;
pub mod select;
pub mod type_text;
pub mod wait;

pub use executor::ActionExecutor;
pub use open_url::normalize_url;

use crate::config::Timings;
use crate::error::{AgentError, Result};
use crate::page::PageDriver;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Default distance for SCROLL, in pixels
pub const DEFAULT_SCROLL_AMOUNT: f64 = 500.0;

/// Default duration for WAIT, in milliseconds
pub const DEFAULT_WAIT_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOptions {
    #[serde(default = "default_checked")]
    pub checked: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self { checked: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollOptions {
    #[serde(default)]
    pub direction: ScrollDirection,

    #[serde(default = "default_scroll_amount")]
    pub amount: f64,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            direction: ScrollDirection::Down,
            amount: DEFAULT_SCROLL_AMOUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitOptions {
    #[serde(default = "default_wait_ms", deserialize_with = "lenient_millis")]
    pub duration_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_WAIT_MS,
        }
    }
}

fn default_checked() -> bool {
    true
}

fn default_scroll_amount() -> f64 {
    DEFAULT_SCROLL_AMOUNT
}

fn default_wait_ms() -> u64 {
    DEFAULT_WAIT_MS
}

/// Accept any JSON number of milliseconds, rounded and clamped at zero
fn lenient_millis<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = f64::deserialize(deserializer)?;
    if !millis.is_finite() {
        return Err(serde::de::Error::custom("durationMs must be a finite number"));
    }
    Ok(millis.max(0.0).round() as u64)
}

/// What an action does, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum ActionKind {
    Click {
        target_id: String,
    },
    Type {
        target_id: String,
        value: String,
    },
    Select {
        target_id: String,
        value: String,
    },
    Check {
        target_id: String,
        #[serde(default)]
        options: CheckOptions,
    },
    Scroll {
        #[serde(default)]
        options: ScrollOptions,
    },
    Wait {
        #[serde(default)]
        options: WaitOptions,
    },
    OpenUrl {
        value: String,
    },
}

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,

    #[serde(default)]
    pub description: String,

    /// Keep executing the plan even if this action fails
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub continue_on_error: bool,
}

impl Action {
    pub fn new(kind: ActionKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            continue_on_error: false,
        }
    }

    pub fn click(target_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ActionKind::Click { target_id: target_id.into() }, description)
    }

    pub fn type_text(target_id: impl Into<String>, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            ActionKind::Type {
                target_id: target_id.into(),
                value: value.into(),
            },
            description,
        )
    }

    pub fn select(target_id: impl Into<String>, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            ActionKind::Select {
                target_id: target_id.into(),
                value: value.into(),
            },
            description,
        )
    }

    pub fn check(target_id: impl Into<String>, checked: bool, description: impl Into<String>) -> Self {
        Self::new(
            ActionKind::Check {
                target_id: target_id.into(),
                options: CheckOptions { checked },
            },
            description,
        )
    }

    pub fn scroll(direction: ScrollDirection, description: impl Into<String>) -> Self {
        Self::new(
            ActionKind::Scroll {
                options: ScrollOptions {
                    direction,
                    ..Default::default()
                },
            },
            description,
        )
    }

    pub fn wait(duration_ms: u64, description: impl Into<String>) -> Self {
        Self::new(
            ActionKind::Wait {
                options: WaitOptions { duration_ms },
            },
            description,
        )
    }

    pub fn open_url(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ActionKind::OpenUrl { value: url.into() }, description)
    }

    /// Builder method: keep going if this action fails
    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }

    /// Wire name of the action type
    pub fn name(&self) -> &'static str {
        match self.kind {
            ActionKind::Click { .. } => "CLICK",
            ActionKind::Type { .. } => "TYPE",
            ActionKind::Select { .. } => "SELECT",
            ActionKind::Check { .. } => "CHECK",
            ActionKind::Scroll { .. } => "SCROLL",
            ActionKind::Wait { .. } => "WAIT",
            ActionKind::OpenUrl { .. } => "OPEN_URL",
        }
    }

    /// Element the action operates on, if any
    pub fn target_id(&self) -> Option<&str> {
        match &self.kind {
            ActionKind::Click { target_id }
            | ActionKind::Type { target_id, .. }
            | ActionKind::Select { target_id, .. }
            | ActionKind::Check { target_id, .. } => Some(target_id.as_str()),
            ActionKind::Scroll { .. } | ActionKind::Wait { .. } | ActionKind::OpenUrl { .. } => None,
        }
    }

    /// Whether the action replaces the current document
    pub fn is_navigation(&self) -> bool {
        matches!(self.kind, ActionKind::OpenUrl { .. })
    }
}

/// Outcome of one executed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    pub action: Action,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn success(action: Action) -> Self {
        Self {
            success: true,
            target_id: action.target_id().map(str::to_string),
            action,
            error: None,
        }
    }

    pub fn failure(action: Action, error: impl Into<String>) -> Self {
        Self {
            success: false,
            target_id: action.target_id().map(str::to_string),
            action,
            error: Some(error.into()),
        }
    }
}

/// Page access and timings shared by the individual actions
pub struct ActionContext<'a> {
    pub driver: &'a dyn PageDriver,
    pub timings: &'a Timings,
}

impl<'a> ActionContext<'a> {
    pub fn new(driver: &'a dyn PageDriver, timings: &'a Timings) -> Self {
        Self { driver, timings }
    }

    /// Fail with `Element not found` unless the ID resolves in the current epoch
    pub fn locate(&self, target_id: &str) -> Result<()> {
        if self.driver.contains(target_id)? {
            Ok(())
        } else {
            Err(AgentError::ElementNotFound(target_id.to_string()))
        }
    }

    /// Scroll into view, let layout settle, then highlight
    pub fn prepare(&self, target_id: &str) -> Result<()> {
        self.driver.scroll_into_view(target_id)?;
        self.pause(self.timings.settle());
        self.highlight(target_id)
    }

    /// Scroll into view and highlight without waiting
    pub fn reveal(&self, target_id: &str) -> Result<()> {
        self.driver.scroll_into_view(target_id)?;
        self.highlight(target_id)
    }

    fn highlight(&self, target_id: &str) -> Result<()> {
        self.driver
            .highlight(target_id, Duration::from_millis(self.timings.highlight_ms))
    }

    pub fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_click_wire_format() {
        let action = Action::click("agent-3", "Press submit");
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(
            json,
            json!({"type": "CLICK", "targetId": "agent-3", "description": "Press submit"})
        );
    }

    #[test]
    fn test_parse_defaults() {
        let action: Action = serde_json::from_value(json!({"type": "SCROLL"})).unwrap();
        assert_eq!(
            action.kind,
            ActionKind::Scroll {
                options: ScrollOptions {
                    direction: ScrollDirection::Down,
                    amount: 500.0
                }
            }
        );
        assert_eq!(action.description, "");
        assert!(!action.continue_on_error);

        let action: Action = serde_json::from_value(json!({"type": "WAIT", "options": {}})).unwrap();
        assert_eq!(action.kind, ActionKind::Wait { options: WaitOptions { duration_ms: 1000 } });

        let action: Action = serde_json::from_value(json!({"type": "CHECK", "targetId": "agent-1"})).unwrap();
        assert_eq!(
            action.kind,
            ActionKind::Check {
                target_id: "agent-1".to_string(),
                options: CheckOptions { checked: true }
            }
        );
    }

    #[test]
    fn test_parse_full_options() {
        let action: Action = serde_json::from_value(json!({
            "type": "SCROLL",
            "options": {"direction": "up", "amount": 250},
            "description": "Back to top",
            "continueOnError": true
        }))
        .unwrap();

        assert_eq!(action.name(), "SCROLL");
        assert!(action.continue_on_error);
        assert_eq!(
            action.kind,
            ActionKind::Scroll {
                options: ScrollOptions {
                    direction: ScrollDirection::Up,
                    amount: 250.0
                }
            }
        );

        let action: Action =
            serde_json::from_value(json!({"type": "WAIT", "options": {"durationMs": 2500}})).unwrap();
        assert_eq!(action.kind, ActionKind::Wait { options: WaitOptions { duration_ms: 2500 } });
    }

    #[test]
    fn test_wait_duration_accepts_any_number() {
        let duration = |value: serde_json::Value| -> u64 {
            let action: Action = serde_json::from_value(json!({"type": "WAIT", "options": {"durationMs": value}})).unwrap();
            match action.kind {
                ActionKind::Wait { options } => options.duration_ms,
                other => panic!("unexpected action {:?}", other),
            }
        };
        assert_eq!(duration(json!(1500.0)), 1500);
        assert_eq!(duration(json!(249.6)), 250);
        assert_eq!(duration(json!(-20)), 0);
    }

    #[test]
    fn test_open_url_wire_name() {
        let action: Action =
            serde_json::from_value(json!({"type": "OPEN_URL", "value": "example.com"})).unwrap();
        assert!(action.is_navigation());
        assert_eq!(action.target_id(), None);
        assert_eq!(serde_json::to_value(&action).unwrap()["type"], "OPEN_URL");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: serde_json::Result<Action> = serde_json::from_value(json!({"type": "HOVER", "targetId": "agent-1"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_carries_target() {
        let result = ActionResult::failure(Action::type_text("agent-9", "hi", ""), "Element not found: agent-9");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["targetId"], "agent-9");
        assert_eq!(json["error"], "Element not found: agent-9");
        assert_eq!(json["action"]["type"], "TYPE");

        let ok = ActionResult::success(Action::wait(10, ""));
        assert!(ok.target_id.is_none());
        assert!(ok.error.is_none());
    }
}
