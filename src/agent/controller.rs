use crate::actions::{Action, ActionKind, ActionResult, normalize_url};
use crate::agent::channel::PageChannel;
use crate::agent::intent::is_actionable;
use crate::agent::session::{ResumeDecision, SessionRegistry};
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::page::PageDriver;
use crate::resolver::PlanResolver;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Where a task ended up after one controller pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The message was conversational, not a request to act
    NotActionable,
    /// A plan was already executing for the tab
    Dropped,
    /// A page load arrived with nothing pending
    Idle,
    /// The resolver found nothing left to do
    Completed,
    Executed { results: Vec<ActionResult> },
    /// An OPEN_URL was issued; the task resumes once the page loads
    Navigating { url: String, results: Vec<ActionResult> },
    RestrictedPage { url: String },
    Failed { error: String },
    Dictated { success: bool },
    Closed,
}

impl TaskOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            TaskOutcome::NotActionable => "not_actionable",
            TaskOutcome::Dropped => "dropped",
            TaskOutcome::Idle => "idle",
            TaskOutcome::Completed => "completed",
            TaskOutcome::Executed { .. } => "executed",
            TaskOutcome::Navigating { .. } => "navigating",
            TaskOutcome::RestrictedPage { .. } => "restricted_page",
            TaskOutcome::Failed { .. } => "failed",
            TaskOutcome::Dictated { .. } => "dictated",
            TaskOutcome::Closed => "closed",
        }
    }

    /// Whether the task is waiting on a page load
    pub fn is_navigating(&self) -> bool {
        matches!(self, TaskOutcome::Navigating { .. })
    }

    /// Results of the actions run in this pass
    pub fn results(&self) -> &[ActionResult] {
        match self {
            TaskOutcome::Executed { results } | TaskOutcome::Navigating { results, .. } => results,
            _ => &[],
        }
    }
}

/// Drives intents through resolve and execute, one pass per call, keeping the
/// per-tab state needed to carry a task across navigations.
pub struct AgentController {
    resolver: PlanResolver,
    sessions: SessionRegistry,
    config: AgentConfig,
}

impl AgentController {
    pub fn new(config: AgentConfig) -> Self {
        let resolver = PlanResolver::from_config(&config.reasoning);
        Self::with_resolver(config, resolver)
    }

    pub fn with_resolver(config: AgentConfig, resolver: PlanResolver) -> Self {
        Self {
            resolver,
            sessions: SessionRegistry::new(),
            config,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Open a channel to a page using this controller's timings
    pub fn channel(&self, driver: Arc<dyn PageDriver>) -> PageChannel {
        PageChannel::new(driver, &self.config)
    }

    /// Handle a user-authored message for the tab behind `channel`
    pub async fn handle_message(&self, channel: &PageChannel, text: &str) -> TaskOutcome {
        if !is_actionable(text) {
            log::debug!("Message is not actionable: {:?}", text);
            return TaskOutcome::NotActionable;
        }

        let tab_id = channel.tab_id();
        if !self.sessions.try_start(tab_id) {
            log::warn!("Dropping {:?}: a plan is already executing in tab {}", text, tab_id);
            return TaskOutcome::Dropped;
        }

        log::info!("Starting task {:?} in tab {}", text, tab_id);
        self.run(channel, text).await
    }

    /// Resume a suspended task once the tab finished loading
    pub async fn on_page_loaded(&self, channel: &PageChannel) -> TaskOutcome {
        let tab_id = channel.tab_id();
        match self.sessions.start_resume(tab_id, self.config.max_resumes) {
            ResumeDecision::NothingPending => TaskOutcome::Idle,
            ResumeDecision::LimitReached(intent) => {
                log::warn!("Giving up on {:?} after {} navigation(s)", intent, self.config.max_resumes);
                TaskOutcome::Failed {
                    error: format!("Task abandoned after {} navigations", self.config.max_resumes),
                }
            }
            ResumeDecision::Resume(intent) => {
                log::info!("Resuming {:?} in tab {}", intent, tab_id);
                tokio::time::sleep(self.config.timings.resume_settle()).await;
                self.run(channel, &intent).await
            }
        }
    }

    /// Keep resuming after each navigation until the task settles.
    ///
    /// Returns every pass, starting with `first`. The resume cap bounds the loop.
    pub async fn follow_navigations(&self, channel: &PageChannel, first: TaskOutcome) -> Vec<TaskOutcome> {
        let mut passes = vec![first];

        while passes.last().is_some_and(TaskOutcome::is_navigating) {
            let next = match channel.wait_for_load().await {
                Ok(()) => self.on_page_loaded(channel).await,
                Err(e) => {
                    log::warn!("Page never finished loading: {}", e);
                    self.sessions.fail(channel.tab_id());
                    TaskOutcome::Failed { error: e.to_string() }
                }
            };
            passes.push(next);
        }

        passes
    }

    /// Insert dictated text at the page's focused element
    pub async fn dictate(&self, channel: &PageChannel, text: &str) -> TaskOutcome {
        match channel.dictate(text).await {
            Ok(success) => TaskOutcome::Dictated { success },
            Err(AgentError::RestrictedPage(url)) => TaskOutcome::RestrictedPage { url },
            Err(e) => TaskOutcome::Failed { error: e.to_string() },
        }
    }

    /// Forget everything about a closed tab
    pub fn close_tab(&self, tab_id: &str) -> TaskOutcome {
        if self.sessions.remove(tab_id).is_some() {
            log::debug!("Removed session for tab {}", tab_id);
        }
        TaskOutcome::Closed
    }

    async fn run(&self, channel: &PageChannel, intent: &str) -> TaskOutcome {
        let tab_id = channel.tab_id();
        match self.pass(channel, intent).await {
            Ok(outcome) => outcome,
            Err(AgentError::RestrictedPage(url)) => {
                log::warn!("Cannot automate {}", url);
                self.sessions.fail(tab_id);
                TaskOutcome::RestrictedPage { url }
            }
            Err(e) => {
                log::warn!("Task {:?} failed: {}", intent, e);
                self.sessions.fail(tab_id);
                TaskOutcome::Failed { error: e.to_string() }
            }
        }
    }

    /// One resolve-and-execute pass over a fresh snapshot
    async fn pass(&self, channel: &PageChannel, intent: &str) -> Result<TaskOutcome> {
        let tab_id = channel.tab_id();
        let snapshot = channel.scrape().await?;
        let plan = self.resolver.resolve(intent, &snapshot).await;

        if plan.is_empty() {
            log::info!("Nothing left to do for {:?}", intent);
            self.sessions.complete(tab_id);
            return Ok(TaskOutcome::Completed);
        }

        log::info!("Executing {} action(s) on {}", plan.len(), snapshot.url);
        let mut results = Vec::with_capacity(plan.len());

        for action in plan {
            if let ActionKind::OpenUrl { value } = &action.kind {
                if value.trim().is_empty() {
                    let halt = !action.continue_on_error;
                    results.push(ActionResult::failure(action, "OPEN_URL requires a non-empty value"));
                    if halt {
                        break;
                    }
                    continue;
                }

                // Record the pending intent first so the load signal always finds it
                let url = normalize_url(value);
                self.sessions.suspend(tab_id, intent);
                channel.navigate(&url).await?;
                results.push(ActionResult::success(action));
                return Ok(TaskOutcome::Navigating { url, results });
            }

            let result = self.execute_one(channel, action.clone()).await?;
            let halt = !result.success && !action.continue_on_error;
            results.push(result);
            if halt {
                break;
            }
        }

        self.sessions.release(tab_id);
        Ok(TaskOutcome::Executed { results })
    }

    async fn execute_one(&self, channel: &PageChannel, action: Action) -> Result<ActionResult> {
        let fallback = action.clone();
        let mut results = channel.execute(vec![action]).await?;
        Ok(results
            .pop()
            .unwrap_or_else(|| ActionResult::failure(fallback, "No result returned by the page")))
    }

    /// Serve commands until every [`AgentHandle`] is dropped, one task per command
    pub async fn serve(self: Arc<Self>, mut commands: mpsc::Receiver<AgentCommand>) {
        while let Some(command) = commands.recv().await {
            let controller = Arc::clone(&self);
            tokio::spawn(async move { controller.dispatch(command).await });
        }
        log::debug!("Agent command channel closed");
    }

    /// Start serving on the current runtime
    pub fn spawn(self: Arc<Self>, buffer: usize) -> (AgentHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(buffer);
        let task = tokio::spawn(self.serve(rx));
        (AgentHandle { commands: tx }, task)
    }

    async fn dispatch(&self, command: AgentCommand) {
        let (outcome, reply) = match command {
            AgentCommand::UserMessage { channel, text, reply } => (self.handle_message(&channel, &text).await, reply),
            AgentCommand::PageLoaded { channel, reply } => (self.on_page_loaded(&channel).await, reply),
            AgentCommand::Dictate { channel, text, reply } => (self.dictate(&channel, &text).await, reply),
            AgentCommand::TabClosed { tab_id, reply } => (self.close_tab(&tab_id), reply),
        };

        if reply.send(outcome).is_err() {
            log::debug!("Command outcome dropped: receiver went away");
        }
    }
}

/// Inbound controller commands
pub enum AgentCommand {
    UserMessage {
        channel: PageChannel,
        text: String,
        reply: oneshot::Sender<TaskOutcome>,
    },
    PageLoaded {
        channel: PageChannel,
        reply: oneshot::Sender<TaskOutcome>,
    },
    Dictate {
        channel: PageChannel,
        text: String,
        reply: oneshot::Sender<TaskOutcome>,
    },
    TabClosed {
        tab_id: String,
        reply: oneshot::Sender<TaskOutcome>,
    },
}

/// Sender side of the command channel.
///
/// Each call returns as soon as the command is queued; the receiver yields
/// the outcome once the controller is done with it.
#[derive(Clone)]
pub struct AgentHandle {
    commands: mpsc::Sender<AgentCommand>,
}

impl AgentHandle {
    async fn send<F>(&self, build: F) -> Result<oneshot::Receiver<TaskOutcome>>
    where
        F: FnOnce(oneshot::Sender<TaskOutcome>) -> AgentCommand,
    {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| AgentError::ChannelClosed)?;
        Ok(outcome)
    }

    pub async fn submit(&self, channel: PageChannel, text: impl Into<String>) -> Result<oneshot::Receiver<TaskOutcome>> {
        let text = text.into();
        self.send(|reply| AgentCommand::UserMessage { channel, text, reply }).await
    }

    pub async fn page_loaded(&self, channel: PageChannel) -> Result<oneshot::Receiver<TaskOutcome>> {
        self.send(|reply| AgentCommand::PageLoaded { channel, reply }).await
    }

    pub async fn dictate(&self, channel: PageChannel, text: impl Into<String>) -> Result<oneshot::Receiver<TaskOutcome>> {
        let text = text.into();
        self.send(|reply| AgentCommand::Dictate { channel, text, reply }).await
    }

    pub async fn tab_closed(&self, tab_id: impl Into<String>) -> Result<oneshot::Receiver<TaskOutcome>> {
        let tab_id = tab_id.into();
        self.send(|reply| AgentCommand::TabClosed { tab_id, reply }).await
    }
}
