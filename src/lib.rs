//! # browser-agent
//!
//! Turns natural-language intents ("click the login button", "search for shoes")
//! into browser actions on arbitrary pages, driven over the Chrome DevTools
//! Protocol, and keeps a task going when one of those actions navigates.
//!
//! ## Features
//!
//! - **Element indexing**: visible interactive elements become a small labeled
//!   list with `agent-<n>` IDs a planner can reference
//! - **Plan resolution**: an OpenAI-compatible reasoning service plans first, a
//!   deterministic keyword matcher covers for it
//! - **Action execution**: clicks, typing that reactive frameworks observe,
//!   selects, checkboxes, scrolling, waits and navigation
//! - **Navigation resume**: OPEN_URL suspends the task until the next page loads
//! - **MCP Server**: the whole loop as Model Context Protocol tools
//!
//! ## MCP Server
//!
//! ```bash
//! # Run headless browser
//! cargo run --bin mcp-server
//!
//! # Run with visible browser over HTTP
//! cargo run --bin mcp-server -- --headed --transport http
//! ```
//!
//! ## Library Usage
//!
//! ### Running an intent
//!
//! ```rust,no_run
//! use browser_agent::{AgentConfig, AgentController, BrowserSession, LaunchOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> browser_agent::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//!
//! let controller = AgentController::new(AgentConfig::default().from_env()?);
//! let channel = controller.channel(session.page()?);
//!
//! let first = controller.handle_message(&channel, "click the More information link").await;
//! for outcome in controller.follow_navigations(&channel, first).await {
//!     println!("{}", outcome.status());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Indexing a page
//!
//! ```rust,no_run
//! use browser_agent::{BrowserSession, LaunchOptions};
//! use browser_agent::page::PageDriver;
//!
//! # fn main() -> browser_agent::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//!
//! let page = session.page()?;
//! page.inject()?;
//! let snapshot = browser_agent::dom::scan(page.as_ref())?;
//! for element in &snapshot.elements {
//!     println!("{} {} {}", element.id, element.element_type.as_str(), element.label);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: element indexing and page snapshots
//! - [`actions`]: the action vocabulary and its executor
//! - [`resolver`]: intent to plan, via reasoning service or fallback matcher
//! - [`agent`]: the controller, per-tab sessions and the command channel
//! - [`page`]: the [`page::PageDriver`] seam and its Chrome implementation
//! - [`browser`]: browser session management and configuration
//! - [`config`]: agent timings and reasoning settings
//! - [`error`]: error types and result aliases
//! - [`mcp`]: **Model Context Protocol server** (requires `mcp-handler` feature)

pub mod actions;
pub mod agent;
pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod page;
pub mod resolver;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use actions::{Action, ActionExecutor, ActionKind, ActionResult};
pub use agent::{AgentController, AgentHandle, PageChannel, TaskOutcome};
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use config::{AgentConfig, Timings};
pub use dom::{ElementRecord, ElementType, PageSnapshot};
pub use error::{AgentError, Result};
pub use resolver::{FallbackResolver, PlanResolver};

#[cfg(feature = "mcp-handler")]
pub use mcp::AgentServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
