//! Browser agent MCP server
//!
//! Exposes the natural-language browser agent over the Model Context Protocol.
//! Logs go to stderr so the stdio transport stays clean.

use anyhow::Context;
use browser_agent::browser::{ConnectionOptions, LaunchOptions};
use browser_agent::config::AgentConfig;
use browser_agent::mcp::AgentServer;
use clap::{Parser, ValueEnum};
use rmcp::{ServiceExt, transport::stdio};
use rmcp::transport::streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    /// Standard input/output transport (default)
    Stdio,
    /// HTTP streamable transport
    Http,
}

#[derive(Parser)]
#[command(name = "mcp-server")]
#[command(version)]
#[command(about = "Browser automation agent MCP server", long_about = None)]
struct Cli {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Agent configuration file (JSON)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Transport type to use
    #[arg(long, short = 't', value_enum, default_value = "stdio")]
    transport: Transport,

    /// Port for HTTP transport (default: 3000)
    #[arg(long, short = 'p', default_value = "3000")]
    port: u16,

    /// HTTP streamable endpoint path (default: /mcp)
    #[arg(long, default_value = "/mcp")]
    http_path: String,
}

impl Cli {
    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(!self.headed);
        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path.clone());
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir.clone());
        }
        options
    }

    fn agent_config(&self) -> anyhow::Result<AgentConfig> {
        let config = match &self.config {
            Some(path) => AgentConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
            None => AgentConfig::default(),
        };
        Ok(config.from_env()?)
    }

    fn server(&self, config: AgentConfig) -> browser_agent::Result<AgentServer> {
        match &self.ws_endpoint {
            Some(url) => AgentServer::connect(ConnectionOptions::new(url.clone()), config),
            None => AgentServer::with_options(self.launch_options(), config),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.agent_config()?;

    log::info!("Browser agent MCP server v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Browser mode: {}", if cli.headed { "headed" } else { "headless" });
    if let Some(endpoint) = &cli.ws_endpoint {
        log::info!("WebSocket endpoint: {}", endpoint);
    }

    match cli.transport {
        Transport::Stdio => {
            log::info!("Ready to accept MCP connections via stdio");
            let service = cli.server(config).context("failed to create agent server")?;
            let server = service.serve(stdio()).await?;
            let quit_reason = server.waiting().await?;
            log::info!("Server quit with reason: {:?}", quit_reason);
        }
        Transport::Http => {
            let bind_addr = format!("127.0.0.1:{}", cli.port);

            // One browser shared by every HTTP session
            let service = cli.server(config).context("failed to create agent server")?;
            let http_service = StreamableHttpService::new(
                move || Ok(service.clone()),
                LocalSessionManager::default().into(),
                Default::default(),
            );

            let router = axum::Router::new().nest_service(&cli.http_path, http_service);

            log::info!("Ready to accept MCP connections at http://{}{}", bind_addr, cli.http_path);

            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
    }

    Ok(())
}
