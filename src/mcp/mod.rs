//! MCP (Model Context Protocol) server for the browser agent
//!
//! Exposes the agent loop and the page-side message set as rmcp tools.

pub mod handler;
pub use handler::AgentServer;

use crate::actions::{Action, normalize_url};
use crate::agent::PageChannel;
use crate::error::AgentError;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Agent task parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActParams {
    /// Natural-language instruction, e.g. "search for wireless mouse"
    pub intent: String,
}

/// Raw action parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteParams {
    /// Actions such as {"type":"CLICK","targetId":"agent-3","description":"Submit"}
    pub actions: Vec<Value>,
}

/// Dictation parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DictateParams {
    /// Text to insert at the focused element; spoken punctuation is converted
    pub text: String,
}

/// Navigate tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// URL to navigate to; https:// is assumed when no scheme is given
    pub url: String,
    /// Wait for navigation to complete (default: true)
    #[serde(default = "default_true")]
    pub wait_for_load: bool,
}

/// Snapshot parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotParams {}

fn default_true() -> bool {
    true
}

fn internal(e: AgentError) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| internal(e.into()))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

impl AgentServer {
    /// Resolve the active tab off the async runtime, since tab probing blocks
    async fn channel(&self) -> Result<PageChannel, McpError> {
        let server = self.clone();
        tokio::task::spawn_blocking(move || server.active_channel())
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?
            .map_err(internal)
    }
}

#[tool_router]
impl AgentServer {
    #[tool(
        description = "Carry out a natural-language browser task on the active tab. Plans actions from the current page, executes them and follows navigations until the task settles. Returns the outcome of every pass."
    )]
    async fn agent_act(&self, Parameters(params): Parameters<ActParams>) -> Result<CallToolResult, McpError> {
        let channel = self.channel().await?;
        let first = self.controller().handle_message(&channel, &params.intent).await;
        let passes = self.controller().follow_navigations(&channel, first).await;
        json_result(&passes)
    }

    #[tool(description = "Index the active tab and return its visible interactive elements with agent-<n> IDs")]
    async fn page_snapshot(&self, Parameters(_params): Parameters<SnapshotParams>) -> Result<CallToolResult, McpError> {
        let channel = self.channel().await?;
        let snapshot = channel.scrape().await.map_err(internal)?;
        json_result(&snapshot)
    }

    #[tool(
        description = "Execute explicit actions (CLICK, TYPE, SELECT, CHECK, SCROLL, WAIT, OPEN_URL) against IDs from the latest page_snapshot. Stops at the first failure unless continueOnError is set."
    )]
    async fn page_execute(&self, Parameters(params): Parameters<ExecuteParams>) -> Result<CallToolResult, McpError> {
        let actions = params
            .actions
            .into_iter()
            .map(serde_json::from_value::<Action>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| McpError::invalid_params(format!("Invalid action: {}", e), None))?;

        let channel = self.channel().await?;
        let results = channel.execute(actions).await.map_err(internal)?;
        json_result(&results)
    }

    #[tool(description = "Insert dictated text into the element that currently has focus")]
    async fn page_dictate(&self, Parameters(params): Parameters<DictateParams>) -> Result<CallToolResult, McpError> {
        let channel = self.channel().await?;
        let outcome = self.controller().dictate(&channel, &params.text).await;
        json_result(&outcome)
    }

    #[tool(description = "Navigate the active tab to a URL")]
    async fn browser_navigate(&self, Parameters(params): Parameters<NavigateParams>) -> Result<CallToolResult, McpError> {
        if params.url.trim().is_empty() {
            return Err(McpError::invalid_params("url must not be empty", None));
        }
        let url = normalize_url(&params.url);

        let channel = self.channel().await?;
        channel.navigate(&url).await.map_err(internal)?;
        if params.wait_for_load {
            channel.wait_for_load().await.map_err(internal)?;
        }

        json_result(&serde_json::json!({ "url": url, "waited": params.wait_for_load }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_server_handler<T: rmcp::ServerHandler + Clone + Send + Sync + 'static>() {}

    #[test]
    fn test_agent_server_is_a_handler() {
        assert_server_handler::<AgentServer>();
    }

    #[test]
    fn test_navigate_params_default_wait() {
        let params: NavigateParams = serde_json::from_value(json!({"url": "example.com"})).unwrap();
        assert!(params.wait_for_load);
    }

    #[test]
    fn test_execute_params_parse_actions() {
        let params: ExecuteParams = serde_json::from_value(json!({
            "actions": [
                {"type": "CLICK", "targetId": "agent-3", "description": "Submit"},
                {"type": "WAIT"}
            ]
        }))
        .unwrap();

        let actions: Vec<Action> = params
            .actions
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(actions[0], Action::click("agent-3", "Submit"));
        assert_eq!(actions[1], Action::wait(1000, ""));
    }
}
