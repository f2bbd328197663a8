use crate::actions::{Action, ActionExecutor, ActionResult};
use crate::config::Timings;
use crate::dom::{Indexer, PageSnapshot};
use crate::error::Result;
use crate::page::PageDriver;
use crate::page::dictation::apply_spoken_punctuation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Requests understood by the page side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageRequest {
    ScrapeDom,
    ExecuteActions { actions: Vec<Action> },
    Ping,
    DictateToPage { text: String },
}

impl PageRequest {
    pub fn name(&self) -> &'static str {
        match self {
            PageRequest::ScrapeDom => "SCRAPE_DOM",
            PageRequest::ExecuteActions { .. } => "EXECUTE_ACTIONS",
            PageRequest::Ping => "PING",
            PageRequest::DictateToPage { .. } => "DICTATE_TO_PAGE",
        }
    }
}

/// Replies from the page side, one per request kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageResponse {
    Snapshot { snapshot: PageSnapshot },
    ActionResults { results: Vec<ActionResult> },
    Pong { ready: bool },
    Dictated { success: bool },
}

/// Page-side handler pairing an indexer and an executor with one document
pub struct ContentScript {
    driver: Arc<dyn PageDriver>,
    indexer: Indexer,
    executor: ActionExecutor,
}

impl ContentScript {
    pub fn new(driver: Arc<dyn PageDriver>, timings: Timings) -> Self {
        Self {
            driver,
            indexer: Indexer::new(),
            executor: ActionExecutor::new(timings),
        }
    }

    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// Answer one request
    pub fn handle(&self, request: PageRequest) -> Result<PageResponse> {
        log::debug!("Handling {}", request.name());

        match request {
            PageRequest::ScrapeDom => Ok(PageResponse::Snapshot {
                snapshot: self.scrape()?,
            }),
            PageRequest::ExecuteActions { actions } => Ok(PageResponse::ActionResults {
                results: self.execute(&actions),
            }),
            PageRequest::Ping => Ok(PageResponse::Pong {
                ready: self.driver.ping()?,
            }),
            PageRequest::DictateToPage { text } => Ok(PageResponse::Dictated {
                success: self.dictate(&text)?,
            }),
        }
    }

    pub fn scrape(&self) -> Result<PageSnapshot> {
        self.indexer.scan(self.driver())
    }

    pub fn execute(&self, actions: &[Action]) -> Vec<ActionResult> {
        self.executor.execute_sequence(self.driver(), actions)
    }

    /// Insert dictated text into whatever currently holds focus
    pub fn dictate(&self, text: &str) -> Result<bool> {
        let text = apply_spoken_punctuation(text);
        let inserted = self.driver.insert_at_focus(&text)?;
        if !inserted {
            log::info!("Dictation dropped: focused element is not editable");
        }
        Ok(inserted)
    }
}
