//! Orchestration across resolve, execute and navigation.
//!
//! The controller is the only component holding state across page loads. Each
//! tab gets an [`AgentSession`] in the [`SessionRegistry`]; an OPEN_URL in a
//! plan suspends the task there until the page-loaded signal resumes it
//! against a fresh snapshot.

pub mod channel;
pub mod controller;
pub mod intent;
pub mod session;

pub use channel::{PageChannel, is_restricted_url};
pub use controller::{AgentCommand, AgentController, AgentHandle, TaskOutcome};
pub use intent::is_actionable;
pub use session::{AgentSession, ResumeDecision, SessionRegistry};
