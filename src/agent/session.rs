use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Cross-navigation state for one tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSession {
    pub tab_id: String,

    /// Intent still being worked on across a navigation
    pub pending_intent: Option<String>,

    /// Guards against a second plan starting for the same tab
    pub is_executing: bool,

    /// Navigation resumes taken by the current task
    pub resumes: u32,
}

impl AgentSession {
    pub fn new(tab_id: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            ..Default::default()
        }
    }
}

/// What a page-load signal should do for a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeDecision {
    /// Re-resolve this intent on the new page
    Resume(String),
    NothingPending,
    /// Too many resumes; the pending intent has been dropped
    LimitReached(String),
}

/// Per-tab sessions, independent of one another
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, AgentSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, AgentSession>> {
        // A panic while holding the lock leaves plain data behind, still usable
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a fresh task from user input.
    ///
    /// Returns false when a plan is already executing for the tab. Otherwise
    /// any previous pending intent and resume count are discarded.
    pub fn try_start(&self, tab_id: &str) -> bool {
        let mut sessions = self.lock();
        let session = sessions
            .entry(tab_id.to_string())
            .or_insert_with(|| AgentSession::new(tab_id));

        if session.is_executing {
            return false;
        }

        session.is_executing = true;
        session.pending_intent = None;
        session.resumes = 0;
        true
    }

    /// Claim the pending intent after a page load.
    ///
    /// Resumes bypass the executing guard since the flag was released when the
    /// navigation was issued.
    pub fn start_resume(&self, tab_id: &str, max_resumes: u32) -> ResumeDecision {
        let mut sessions = self.lock();
        let Some(session) = sessions.get_mut(tab_id) else {
            return ResumeDecision::NothingPending;
        };
        let Some(intent) = session.pending_intent.clone() else {
            return ResumeDecision::NothingPending;
        };

        if session.resumes >= max_resumes {
            session.pending_intent = None;
            session.is_executing = false;
            return ResumeDecision::LimitReached(intent);
        }

        session.resumes += 1;
        session.is_executing = true;
        ResumeDecision::Resume(intent)
    }

    /// Record an intent to resume after navigation and release the guard
    pub fn suspend(&self, tab_id: &str, intent: &str) {
        if let Some(session) = self.lock().get_mut(tab_id) {
            session.pending_intent = Some(intent.to_string());
            session.is_executing = false;
        }
    }

    /// Task finished: nothing left to resume
    pub fn complete(&self, tab_id: &str) {
        if let Some(session) = self.lock().get_mut(tab_id) {
            session.pending_intent = None;
            session.is_executing = false;
        }
    }

    /// Release the guard, leaving any pending intent in place
    pub fn release(&self, tab_id: &str) {
        if let Some(session) = self.lock().get_mut(tab_id) {
            session.is_executing = false;
        }
    }

    /// Unrecoverable error: drop the pending intent and return to idle
    pub fn fail(&self, tab_id: &str) {
        self.complete(tab_id);
    }

    pub fn get(&self, tab_id: &str) -> Option<AgentSession> {
        self.lock().get(tab_id).cloned()
    }

    /// Forget a closed tab
    pub fn remove(&self, tab_id: &str) -> Option<AgentSession> {
        self.lock().remove(tab_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
