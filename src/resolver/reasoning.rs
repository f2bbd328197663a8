//! Adapter for an external OpenAI-compatible reasoning service

use crate::actions::Action;
use crate::config::ReasoningConfig;
use crate::dom::{ElementRecord, PageSnapshot};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Action grammar handed to the reasoning service as its system prompt
pub const SYSTEM_PROMPT: &str = r#"You are a browser automation planner. Given a user's intent and the interactive elements of the current page, reply with a JSON array of actions that accomplishes the intent.

Action types:
- {"type":"CLICK","targetId":"agent-0","description":"..."}
- {"type":"TYPE","targetId":"agent-0","value":"text to enter","description":"..."}
- {"type":"SELECT","targetId":"agent-0","value":"option value","description":"..."}
- {"type":"CHECK","targetId":"agent-0","options":{"checked":true},"description":"..."}
- {"type":"SCROLL","options":{"direction":"down","amount":500},"description":"..."}
- {"type":"WAIT","options":{"durationMs":1000},"description":"..."}
- {"type":"OPEN_URL","value":"https://...","description":"..."}

Any action may carry "continueOnError": true to keep going when it fails.

Rules:
1. Only reference targetId values from the element list.
2. Actions after OPEN_URL are discarded; the new page is planned separately.
3. Reply with [] when the intent is already satisfied on this page.
4. Reply with the JSON array only."#;

/// Everything the reasoning service sees for one plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRequest {
    pub intent: String,
    pub url: String,
    pub title: String,
    pub elements: Vec<ElementRecord>,
}

impl PlanRequest {
    /// Build a request keeping at most `cap` elements
    pub fn from_snapshot(intent: &str, snapshot: &PageSnapshot, cap: usize) -> Self {
        Self {
            intent: intent.to_string(),
            url: snapshot.url.clone(),
            title: snapshot.title.clone(),
            elements: snapshot.elements.iter().take(cap).cloned().collect(),
        }
    }

    /// User message content
    pub fn to_prompt(&self) -> Result<String> {
        Ok(format!(
            "Intent: {}\nPage URL: {}\nTitle: {}\n\nElements:\n{}",
            self.intent,
            self.url,
            self.title,
            serde_json::to_string(&self.elements)?
        ))
    }
}

/// Source of free-text plans
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Return the raw reply text, expected to contain one JSON array of actions
    async fn generate_plan(&self, request: &PlanRequest) -> Result<String>;
}

/// Chat-completions client for OpenAI-compatible endpoints
pub struct OpenAiReasoner {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl OpenAiReasoner {
    pub fn new(config: &ReasoningConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AgentError::Transport("No API key configured for the reasoning service".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ReasoningService for OpenAiReasoner {
    async fn generate_plan(&self, request: &PlanRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": request.to_prompt()?},
            ],
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let reply: Value = response
            .json()
            .await
            .map_err(|e| AgentError::Transport(format!("Unreadable response: {}", e)))?;

        if !status.is_success() {
            let message = reply["error"]["message"].as_str().unwrap_or("unknown API error");
            return Err(AgentError::Transport(format!("API error ({}): {}", status, message)));
        }

        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AgentError::Transport("No content in reasoning reply".to_string()))?;

        log::debug!("Reasoning service replied: {}", content);
        Ok(content.to_string())
    }
}

/// Extract the first JSON array of actions from free text.
///
/// Every `[` is tried in turn; text after a complete array is ignored, so
/// markdown fences and prose around the plan are harmless.
pub fn parse_plan(text: &str) -> Option<Vec<Action>> {
    text.match_indices('[').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Vec<Action>>()
            .next()
            .and_then(|parsed| parsed.ok())
    })
}
