use thiserror::Error;

/// Errors produced while driving a browser agent
#[derive(Debug, Error)]
pub enum AgentError {
    /// Failed to launch the browser process
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// A tab could not be created, listed or activated
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Top-level navigation failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Evaluating a script in the page failed
    #[error("Script evaluation failed: {0}")]
    ScriptFailed(String),

    /// The page returned data that could not be decoded
    #[error("Failed to parse DOM data: {0}")]
    DomParseFailed(String),

    /// The referenced element ID is not present in the current scrape epoch
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Script injection is not allowed on this page
    #[error("Cannot automate restricted page: {0}")]
    RestrictedPage(String),

    /// The page-side runtime did not answer a readiness probe
    #[error("Page not ready: {0}")]
    PageNotReady(String),

    /// The reasoning service failed or could not be reached
    #[error("Reasoning service error: {0}")]
    Transport(String),

    /// An action was malformed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The controller command queue has shut down
    #[error("Agent controller is not running")]
    ChannelClosed,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AgentError>;
