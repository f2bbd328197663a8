//! Agent configuration
//!
//! Every field has a default, so a configuration file only needs the keys it
//! wants to change. Environment variables are layered on top with
//! [`AgentConfig::from_env`].

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default OpenAI-compatible chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model used for plan generation
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Delays applied around DOM-touching steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Pause after scrolling an element into view
    pub settle_ms: u64,

    /// How long the highlight outline stays on an element
    pub highlight_ms: u64,

    /// Pause after every action in a sequence
    pub inter_action_ms: u64,

    /// Pause after scrolling the window
    pub scroll_settle_ms: u64,

    /// Pause between a page-load signal and resuming a suspended task
    pub resume_settle_ms: u64,

    /// Pause after injecting the page runtime
    pub inject_settle_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_ms: 200,
            highlight_ms: 1000,
            inter_action_ms: 300,
            scroll_settle_ms: 500,
            resume_settle_ms: 1000,
            inject_settle_ms: 500,
        }
    }
}

impl Timings {
    /// Timings with every delay set to zero
    pub fn instant() -> Self {
        Self {
            settle_ms: 0,
            highlight_ms: 0,
            inter_action_ms: 0,
            scroll_settle_ms: 0,
            resume_settle_ms: 0,
            inject_settle_ms: 0,
        }
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn inter_action(&self) -> Duration {
        Duration::from_millis(self.inter_action_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn resume_settle(&self) -> Duration {
        Duration::from_millis(self.resume_settle_ms)
    }

    pub fn inject_settle(&self) -> Duration {
        Duration::from_millis(self.inject_settle_ms)
    }
}

/// Settings for the external reasoning service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Whether plans are requested from the reasoning service at all
    pub enabled: bool,

    /// Chat completions endpoint
    pub endpoint: String,

    /// Model name sent with every request
    pub model: String,

    /// Bearer token; only read from the environment or set programmatically
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub temperature: f32,

    /// Maximum number of elements sent with a request
    pub max_elements: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: 0.2,
            max_elements: 50,
            timeout_secs: 30,
        }
    }
}

/// Top-level agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub timings: Timings,
    pub reasoning: ReasoningConfig,

    /// Maximum number of navigation resumes for one task
    pub max_resumes: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            reasoning: ReasoningConfig::default(),
            max_resumes: 5,
        }
    }
}

impl AgentConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AgentError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// Overlay values from environment variables
    pub fn from_env(self) -> Result<Self> {
        self.overlay(|key| std::env::var(key).ok())
    }

    fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(key) = var("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.reasoning.api_key = Some(key);
        }
        if let Some(model) = var("BROWSER_AGENT_MODEL") {
            self.reasoning.model = model;
        }
        if let Some(endpoint) = var("BROWSER_AGENT_ENDPOINT") {
            self.reasoning.endpoint = endpoint;
        }
        if let Some(raw) = var("BROWSER_AGENT_MAX_ELEMENTS") {
            self.reasoning.max_elements = raw.parse().map_err(|_| {
                AgentError::InvalidConfig(format!("BROWSER_AGENT_MAX_ELEMENTS must be a number, got '{}'", raw))
            })?;
        }
        if let Some(raw) = var("BROWSER_AGENT_MAX_RESUMES") {
            self.max_resumes = raw.parse().map_err(|_| {
                AgentError::InvalidConfig(format!("BROWSER_AGENT_MAX_RESUMES must be a number, got '{}'", raw))
            })?;
        }
        Ok(self)
    }

    /// Builder method: set timings
    pub fn timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Builder method: set the reasoning model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.reasoning.model = model.into();
        self
    }

    /// Builder method: set the reasoning API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.reasoning.api_key = Some(key.into());
        self
    }

    /// Builder method: enable or disable the reasoning service
    pub fn reasoning_enabled(mut self, enabled: bool) -> Self {
        self.reasoning.enabled = enabled;
        self
    }

    /// Builder method: set the resume cap
    pub fn max_resumes(mut self, max_resumes: u32) -> Self {
        self.max_resumes = max_resumes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.timings.inter_action_ms, 300);
        assert_eq!(config.timings.resume_settle_ms, 1000);
        assert_eq!(config.reasoning.max_elements, 50);
        assert_eq!(config.max_resumes, 5);
        assert!(config.reasoning.api_key.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"timings": {"settle_ms": 50}, "reasoning": {"model": "local"}}"#).unwrap();
        assert_eq!(config.timings.settle_ms, 50);
        assert_eq!(config.timings.highlight_ms, 1000);
        assert_eq!(config.reasoning.model, "local");
        assert_eq!(config.reasoning.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = AgentConfig::new().api_key("sk-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-test"),
            ("BROWSER_AGENT_MODEL", "gpt-test"),
            ("BROWSER_AGENT_MAX_ELEMENTS", "20"),
        ]);
        let config = AgentConfig::new()
            .overlay(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.reasoning.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.reasoning.model, "gpt-test");
        assert_eq!(config.reasoning.max_elements, 20);
    }

    #[test]
    fn test_env_overlay_rejects_bad_number() {
        let result = AgentConfig::new().overlay(|k| (k == "BROWSER_AGENT_MAX_RESUMES").then(|| "lots".to_string()));
        assert!(matches!(result, Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn test_instant_timings() {
        let timings = Timings::instant();
        assert_eq!(timings.settle(), Duration::ZERO);
        assert_eq!(timings.inter_action(), Duration::ZERO);
    }
}
