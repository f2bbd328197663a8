//! Interactive browser agent
//!
//! Runs natural-language intents against a live browser, either from
//! `--intent` arguments or line by line from stdin.

use anyhow::Context;
use browser_agent::actions::normalize_url;
use browser_agent::agent::{AgentController, AgentHandle, TaskOutcome};
use browser_agent::browser::{BrowserSession, ConnectionOptions, LaunchOptions};
use browser_agent::config::AgentConfig;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "browser-agent")]
#[command(version)]
#[command(about = "Turn natural-language intents into browser actions", long_about = None)]
struct Cli {
    /// Intent to run; repeat for several. Reads stdin when omitted
    #[arg(long, short = 'i', value_name = "TEXT")]
    intent: Vec<String>,

    /// Page to open before the first intent
    #[arg(long, short = 'u', value_name = "URL")]
    url: Option<String>,

    /// Agent configuration file (JSON)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only use the deterministic matcher, never the reasoning service
    #[arg(long)]
    no_llm: bool,

    /// Reasoning model to use
    #[arg(long, value_name = "NAME")]
    model: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// WebSocket endpoint URL of a running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,
}

impl Cli {
    fn agent_config(&self) -> anyhow::Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => AgentConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
            None => AgentConfig::default(),
        }
        .from_env()?;

        if let Some(model) = &self.model {
            config = config.model(model.clone());
        }
        if self.no_llm {
            config = config.reasoning_enabled(false);
        }
        Ok(config)
    }
}

/// Run one intent to completion, following navigations through the command channel
async fn run_intent(
    handle: &AgentHandle,
    controller: &AgentController,
    session: &Arc<BrowserSession>,
    intent: &str,
) -> anyhow::Result<()> {
    let page = {
        let session = Arc::clone(session);
        tokio::task::spawn_blocking(move || session.page()).await??
    };
    let channel = controller.channel(page);

    let mut outcome = handle.submit(channel.clone(), intent).await?.await?;
    report(&outcome);

    while outcome.is_navigating() {
        if let Err(e) = channel.wait_for_load().await {
            log::warn!("Page never finished loading: {}", e);
            controller.sessions().fail(channel.tab_id());
            break;
        }
        outcome = handle.page_loaded(channel.clone()).await?.await?;
        report(&outcome);
    }

    Ok(())
}

fn report(outcome: &TaskOutcome) {
    match outcome {
        TaskOutcome::NotActionable => println!("Not a browser action, nothing to do."),
        TaskOutcome::Dropped => println!("Another task is still running in this tab."),
        TaskOutcome::Idle => println!("Nothing pending."),
        TaskOutcome::Completed => println!("Done."),
        TaskOutcome::Navigating { url, .. } => println!("Navigating to {} ...", url),
        TaskOutcome::RestrictedPage { url } => println!("Cannot automate {}", url),
        TaskOutcome::Failed { error } => println!("Failed: {}", error),
        TaskOutcome::Dictated { success } => println!("Dictation {}", if *success { "inserted" } else { "dropped" }),
        TaskOutcome::Closed => println!("Tab closed."),
        TaskOutcome::Executed { .. } => println!("Executed:"),
    }

    for result in outcome.results() {
        let mark = if result.success { "ok" } else { "FAILED" };
        match &result.error {
            Some(error) => println!("  [{}] {} {}: {}", mark, result.action.name(), result.action.description, error),
            None => println!("  [{}] {} {}", mark, result.action.name(), result.action.description),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.agent_config()?;

    let headless = !cli.headed;
    let ws_endpoint = cli.ws_endpoint.clone();
    let start_url = cli.url.as_deref().map(normalize_url);

    let session = tokio::task::spawn_blocking(move || -> browser_agent::Result<BrowserSession> {
        let session = match ws_endpoint {
            Some(url) => BrowserSession::connect(ConnectionOptions::new(url))?,
            None => BrowserSession::launch(LaunchOptions::new().headless(headless))?,
        };
        if let Some(url) = start_url {
            session.navigate(&url)?;
        }
        Ok(session)
    })
    .await?
    .context("failed to start browser")?;
    let session = Arc::new(session);

    let controller = Arc::new(AgentController::new(config));
    let (handle, server) = Arc::clone(&controller).spawn(16);

    if cli.intent.is_empty() {
        eprintln!("Enter an intent per line, Ctrl-D to quit.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let intent = line.trim();
            if intent.is_empty() {
                continue;
            }
            if let Err(e) = run_intent(&handle, &controller, &session, intent).await {
                log::error!("{:#}", e);
            }
        }
    } else {
        for intent in &cli.intent {
            println!("> {}", intent);
            run_intent(&handle, &controller, &session, intent).await?;
        }
    }

    drop(handle);
    server.await?;
    session.close()?;
    Ok(())
}
