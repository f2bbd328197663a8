use crate::agent::{AgentController, PageChannel};
use crate::browser::{BrowserSession, ConnectionOptions, LaunchOptions};
use crate::config::AgentConfig;
use crate::error::Result as AgentResult;
use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool_handler,
};
use std::sync::Arc;

const INSTRUCTIONS: &str = "Browser automation agent. Use agent_act with a natural-language intent \
(\"search for wireless mouse\", \"click the login button\") to have the agent plan and execute it on the \
active tab, following navigations. page_snapshot lists the indexed elements (agent-<n> IDs) and \
page_execute runs explicit actions against them. IDs are only valid until the next snapshot.";

/// MCP server exposing the agent over a live browser
#[derive(Clone)]
pub struct AgentServer {
    session: Arc<BrowserSession>,
    controller: Arc<AgentController>,
    tool_router: ToolRouter<Self>,
}

impl AgentServer {
    /// Launch a browser and build a server around it
    pub fn with_options(options: LaunchOptions, config: AgentConfig) -> AgentResult<Self> {
        let session = BrowserSession::launch(options)?;
        Ok(Self::with_session(session, config))
    }

    /// Attach to a running browser
    pub fn connect(options: ConnectionOptions, config: AgentConfig) -> AgentResult<Self> {
        let session = BrowserSession::connect(options)?;
        Ok(Self::with_session(session, config))
    }

    pub fn with_session(session: BrowserSession, config: AgentConfig) -> Self {
        Self {
            session: Arc::new(session),
            controller: Arc::new(AgentController::new(config)),
            tool_router: Self::tool_router(),
        }
    }

    pub fn session(&self) -> &BrowserSession {
        &self.session
    }

    pub fn controller(&self) -> &AgentController {
        &self.controller
    }

    /// Channel to whichever tab is currently active
    pub fn active_channel(&self) -> AgentResult<PageChannel> {
        let page = self.session.page()?;
        Ok(self.controller.channel(page))
    }
}

#[tool_handler]
impl ServerHandler for AgentServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}
