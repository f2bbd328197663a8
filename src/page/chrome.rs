use crate::dom::{IdAssignment, RawPage};
use crate::error::{AgentError, Result};
use crate::page::{DomEvent, PageDriver};
use headless_chrome::Tab;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

/// Page runtime installed as `window.__browserAgent`
const RUNTIME_JS: &str = include_str!("agent_runtime.js");

const RUNTIME_GLOBAL: &str = "__browserAgent";

const NOT_FOUND_PREFIX: &str = "Element not found: ";

/// Envelope every runtime call returns, so page exceptions surface as data
#[derive(Debug, Deserialize)]
struct CallReply {
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

/// [`PageDriver`] backed by a Chrome DevTools Protocol tab
pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    /// Get the underlying tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn evaluate(&self, script: &str) -> Result<Option<Value>> {
        self.tab
            .evaluate(script, false)
            .map(|remote_object| remote_object.value)
            .map_err(|e| AgentError::ScriptFailed(e.to_string()))
    }

    /// Call a runtime method with JSON arguments
    fn call(&self, method: &str, args: Value) -> Result<Value> {
        let script = format!(
            r#"(() => {{
                const agent = window.{global};
                if (!agent) {{
                    return JSON.stringify({{ ok: false, error: 'agent runtime not injected' }});
                }}
                try {{
                    return JSON.stringify({{ ok: true, value: agent.{method}(...{args}) ?? null }});
                }} catch (e) {{
                    return JSON.stringify({{ ok: false, error: String((e && e.message) || e) }});
                }}
            }})()"#,
            global = RUNTIME_GLOBAL,
            method = method,
            args = args,
        );

        let raw = self
            .evaluate(&script)?
            .ok_or_else(|| AgentError::ScriptFailed(format!("No value returned from {}", method)))?;

        // The runtime returns a JSON string, so it has to be parsed a second time
        let reply: CallReply = match raw.as_str() {
            Some(json_str) => serde_json::from_str(json_str),
            None => serde_json::from_value(raw),
        }
        .map_err(|e| AgentError::DomParseFailed(format!("Malformed reply from {}: {}", method, e)))?;

        if reply.ok {
            return Ok(reply.value);
        }

        let error = reply.error.unwrap_or_else(|| "unknown error".to_string());
        match error.strip_prefix(NOT_FOUND_PREFIX) {
            Some(id) => Err(AgentError::ElementNotFound(id.to_string())),
            None => Err(AgentError::ScriptFailed(format!("{}: {}", method, error))),
        }
    }
}

impl PageDriver for ChromePage {
    fn tab_id(&self) -> String {
        self.tab.get_target_id().to_string()
    }

    fn url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    fn ping(&self) -> Result<bool> {
        let probe = format!("typeof window.{0} === 'object' && window.{0} !== null", RUNTIME_GLOBAL);
        Ok(self.evaluate(&probe)?.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn inject(&self) -> Result<()> {
        self.evaluate(RUNTIME_JS)?;
        log::debug!("Injected page runtime into {}", self.tab.get_url());
        Ok(())
    }

    fn collect(&self) -> Result<RawPage> {
        let value = self.call("collect", json!([]))?;
        serde_json::from_value(value)
            .map_err(|e| AgentError::DomParseFailed(format!("Failed to parse collected elements: {}", e)))
    }

    fn tag(&self, assignments: &[IdAssignment]) -> Result<()> {
        self.call("tag", json!([assignments]))?;
        Ok(())
    }

    fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.call("contains", json!([id]))?.as_bool().unwrap_or(false))
    }

    fn scroll_into_view(&self, id: &str) -> Result<()> {
        self.call("scrollIntoView", json!([id])).map(drop)
    }

    fn highlight(&self, id: &str, duration: Duration) -> Result<()> {
        self.call("highlight", json!([id, duration.as_millis() as u64])).map(drop)
    }

    fn click(&self, id: &str) -> Result<()> {
        self.call("click", json!([id])).map(drop)
    }

    fn focus(&self, id: &str) -> Result<()> {
        self.call("focus", json!([id])).map(drop)
    }

    fn clear_value(&self, id: &str) -> Result<()> {
        self.call("clearValue", json!([id])).map(drop)
    }

    fn insert_text(&self, id: &str, text: &str) -> Result<()> {
        self.call("insertText", json!([id, text])).map(drop)
    }

    fn dispatch(&self, id: &str, event: DomEvent) -> Result<()> {
        self.call("dispatch", json!([id, event.as_str()])).map(drop)
    }

    fn set_value(&self, id: &str, value: &str) -> Result<()> {
        self.call("setValue", json!([id, value])).map(drop)
    }

    fn set_checked(&self, id: &str, checked: bool) -> Result<()> {
        self.call("setChecked", json!([id, checked])).map(drop)
    }

    fn scroll_window(&self, delta_y: f64) -> Result<()> {
        self.call("scrollWindow", json!([delta_y])).map(drop)
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| AgentError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        Ok(())
    }

    fn wait_for_load(&self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .map_err(|e| AgentError::NavigationFailed(format!("Navigation timeout: {}", e)))?;
        Ok(())
    }

    fn insert_at_focus(&self, text: &str) -> Result<bool> {
        Ok(self.call("insertAtFocus", json!([text]))?.as_bool().unwrap_or(false))
    }
}
