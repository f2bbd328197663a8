use crate::actions::ActionContext;
use crate::error::{AgentError, Result};

/// Schemes accepted as-is; everything else is treated as a bare host
const KNOWN_SCHEMES: [&str; 6] = ["http://", "https://", "file://", "data:", "about:", "chrome://"];

/// Prefix a URL with `https://` when it carries no scheme
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    let lower = trimmed.to_ascii_lowercase();
    if KNOWN_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) || trimmed.contains("://") {
        return trimmed.to_string();
    }

    // Local development servers rarely speak TLS
    if lower.starts_with("localhost") || lower.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    format!("https://{}", trimmed.trim_start_matches('/'))
}

/// Navigate the top-level document
pub fn perform(ctx: &ActionContext<'_>, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(AgentError::InvalidAction("OPEN_URL requires a non-empty value".to_string()));
    }

    let normalized = normalize_url(url);
    log::info!("Opening {}", normalized);
    ctx.driver.navigate(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_complete() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com/Path"), "HTTPS://Example.com/Path");
        assert_eq!(normalize_url("ftp://files.example.com"), "ftp://files.example.com");
    }

    #[test]
    fn test_normalize_url_missing_scheme() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("example.com/path?q=1"), "https://example.com/path?q=1");
        assert_eq!(normalize_url("www.google.com"), "https://www.google.com");
        assert_eq!(normalize_url("//cdn.example.com"), "https://cdn.example.com");
    }

    #[test]
    fn test_normalize_url_localhost() {
        assert_eq!(normalize_url("localhost:3000"), "http://localhost:3000");
        assert_eq!(normalize_url("127.0.0.1:8080/app"), "http://127.0.0.1:8080/app");
    }

    #[test]
    fn test_normalize_url_special_schemes() {
        assert_eq!(normalize_url("about:blank"), "about:blank");
        assert_eq!(normalize_url("data:text/html,<h1>Hi</h1>"), "data:text/html,<h1>Hi</h1>");
        assert_eq!(normalize_url("file:///tmp/index.html"), "file:///tmp/index.html");
    }

    #[test]
    fn test_normalize_url_whitespace() {
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
    }
}
