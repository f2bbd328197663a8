//! Browser session management
//!
//! Launches or attaches to a Chrome/Chromium instance and hands out pages for
//! the active tab.

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
