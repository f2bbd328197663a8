use crate::actions::{Action, ActionResult};
use crate::config::AgentConfig;
use crate::dom::PageSnapshot;
use crate::error::{AgentError, Result};
use crate::page::{ContentScript, PageDriver, PageRequest, PageResponse};
use std::sync::Arc;
use std::time::Duration;

/// URL prefixes where the browser refuses script injection
const RESTRICTED_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "chrome-search://",
    "chrome-untrusted://",
    "edge://",
    "devtools://",
    "view-source:",
    "https://chrome.google.com/webstore",
    "https://chromewebstore.google.com",
];

/// Whether a page cannot be automated at all
pub fn is_restricted_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    if url.starts_with("about:") {
        return url != "about:blank";
    }
    RESTRICTED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Controller-side handle to one tab's content script.
///
/// Page work is blocking CDP traffic, so every call runs on the blocking pool.
#[derive(Clone)]
pub struct PageChannel {
    tab_id: String,
    script: Arc<ContentScript>,
    inject_settle: Duration,
}

impl PageChannel {
    pub fn new(driver: Arc<dyn PageDriver>, config: &AgentConfig) -> Self {
        Self {
            tab_id: driver.tab_id(),
            script: Arc::new(ContentScript::new(driver, config.timings.clone())),
            inject_settle: config.timings.inject_settle(),
        }
    }

    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&ContentScript) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let script = Arc::clone(&self.script);
        tokio::task::spawn_blocking(move || work(&script))
            .await
            .map_err(|e| AgentError::TabOperationFailed(format!("Page task aborted: {}", e)))?
    }

    pub async fn url(&self) -> Result<String> {
        self.blocking(|script| script.driver().url()).await
    }

    pub async fn ping(&self) -> Result<bool> {
        match self.blocking(|script| script.handle(PageRequest::Ping)).await? {
            PageResponse::Pong { ready } => Ok(ready),
            other => Err(unexpected("PING", &other)),
        }
    }

    /// Make sure the page can take requests.
    ///
    /// Restricted pages are rejected outright. A page that does not answer
    /// PING gets one injection and a settle delay before being probed again.
    pub async fn ensure_ready(&self) -> Result<()> {
        let url = self.url().await?;
        if is_restricted_url(&url) {
            return Err(AgentError::RestrictedPage(url));
        }

        if self.ping().await? {
            return Ok(());
        }

        log::debug!("Page runtime missing on {}, injecting", url);
        self.blocking(|script| script.driver().inject()).await?;
        tokio::time::sleep(self.inject_settle).await;

        if self.ping().await? {
            Ok(())
        } else {
            Err(AgentError::PageNotReady(url))
        }
    }

    /// Send a request once the page is ready
    pub async fn request(&self, request: PageRequest) -> Result<PageResponse> {
        if request != PageRequest::Ping {
            self.ensure_ready().await?;
        }
        self.blocking(move |script| script.handle(request)).await
    }

    pub async fn scrape(&self) -> Result<PageSnapshot> {
        match self.request(PageRequest::ScrapeDom).await? {
            PageResponse::Snapshot { snapshot } => Ok(snapshot),
            other => Err(unexpected("SCRAPE_DOM", &other)),
        }
    }

    pub async fn execute(&self, actions: Vec<Action>) -> Result<Vec<ActionResult>> {
        match self.request(PageRequest::ExecuteActions { actions }).await? {
            PageResponse::ActionResults { results } => Ok(results),
            other => Err(unexpected("EXECUTE_ACTIONS", &other)),
        }
    }

    pub async fn dictate(&self, text: &str) -> Result<bool> {
        let request = PageRequest::DictateToPage { text: text.to_string() };
        match self.request(request).await? {
            PageResponse::Dictated { success } => Ok(success),
            other => Err(unexpected("DICTATE_TO_PAGE", &other)),
        }
    }

    /// Navigate from the controller side, outside the page runtime
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        self.blocking(move |script| script.driver().navigate(&url)).await
    }

    pub async fn wait_for_load(&self) -> Result<()> {
        self.blocking(|script| script.driver().wait_for_load()).await
    }
}

fn unexpected(request: &str, response: &PageResponse) -> AgentError {
    AgentError::ScriptFailed(format!("Unexpected reply to {}: {:?}", request, response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_urls() {
        assert!(is_restricted_url("chrome://settings"));
        assert!(is_restricted_url("chrome-extension://abc/popup.html"));
        assert!(is_restricted_url("edge://flags"));
        assert!(is_restricted_url("view-source:https://example.com"));
        assert!(is_restricted_url("about:newtab"));
        assert!(is_restricted_url("https://chromewebstore.google.com/detail/x"));
        assert!(is_restricted_url("CHROME://version"));
    }

    #[test]
    fn test_allowed_urls() {
        assert!(!is_restricted_url("https://example.com"));
        assert!(!is_restricted_url("http://localhost:3000"));
        assert!(!is_restricted_url("about:blank"));
        assert!(!is_restricted_url("data:text/html,<p>hi</p>"));
        assert!(!is_restricted_url("file:///tmp/page.html"));
    }
}
