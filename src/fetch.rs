use crate::config::FetchConfig;
use crate::error::{AppError, InputField};
use anyhow::{anyhow, Context, Result};
use regex::{Regex, RegexBuilder};
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// An input field is treated as a URL exactly when it starts with an HTTP
/// scheme. Anything else is literal text, whitespace and all.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"<script[^>]*>.*?</script>")
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("script pattern is valid")
    })
}

fn style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"<style[^>]*>.*?</style>")
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .expect("style pattern is valid")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Best-effort extraction of visible text from an HTML document.
///
/// The substitutions run in a fixed order over the whole document: script
/// blocks out, style blocks out, remaining tags become a single space,
/// whitespace runs collapse, then trim. Not a parser: entities are left
/// encoded and malformed or nested tags are not handled robustly.
pub fn strip_html(html: &str) -> String {
    let text = script_re().replace_all(html, "");
    let text = style_re().replace_all(&text, "");
    let text = tag_re().replace_all(&text, " ");
    let text = whitespace_re().replace_all(&text, " ");
    text.trim().to_string()
}

/// Turns a request field (literal text or URL) into plain text.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build fetch HTTP client")?;

        Ok(Self { client })
    }

    /// Identity for literal text; fetch-and-strip for URL input. A failed
    /// retrieval surfaces as a fetch error tagged with the offending field.
    pub async fn normalize(&self, input: &str, field: InputField) -> Result<String, AppError> {
        if !is_url(input) {
            return Ok(input.to_string());
        }

        self.fetch_text(input).await.map_err(|e| AppError::Fetch {
            field,
            detail: e.to_string(),
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|s| s.to_string()));
        debug!(host = host.as_deref().unwrap_or("unknown"), "Fetching URL content");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} returned status {}", url, status));
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", url))?;

        Ok(strip_html(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_urls_by_scheme_prefix() {
        assert!(is_url("http://example.com/jobs/1"));
        assert!(is_url("https://example.com/resume"));
        assert!(!is_url("Senior Engineer with 10 years of experience"));
        assert!(!is_url("ftp://example.com/file"));
        assert!(!is_url(" https://leading-space.example.com"));
    }

    #[test]
    fn strips_scripts_tags_and_collapses_whitespace() {
        let html = "<html><body><script>evil()</script><p>Hello  World</p></body></html>";
        assert_eq!(strip_html(html), "Hello World");
    }

    #[test]
    fn strips_style_blocks_and_multiline_scripts() {
        let html = "<style type=\"text/css\">\nbody { color: red }\n</style>\
                    <SCRIPT>\nvar x = 1;\nalert(x);\n</SCRIPT>\n<div>Job posting</div>";
        assert_eq!(strip_html(html), "Job posting");
    }

    #[test]
    fn strip_html_is_idempotent_on_plain_text() {
        let plain = "Senior Rust Engineer - Backend Team";
        let once = strip_html(plain);
        assert_eq!(strip_html(&once), once);
    }

    #[test]
    fn leaves_entities_encoded() {
        // Known limitation: no entity decoding.
        assert_eq!(strip_html("<p>R&amp;D team</p>"), "R&amp;D team");
    }

    #[tokio::test]
    async fn normalize_is_identity_for_literal_text() {
        let fetcher = Fetcher::new(&FetchConfig::default()).expect("fetcher");
        let text = "  Plain resume text, not a URL  ";
        let out = fetcher
            .normalize(text, InputField::Resume)
            .await
            .expect("literal input must pass through");
        assert_eq!(out, text);
    }

    #[tokio::test]
    async fn normalize_fetches_and_strips_url_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/posting")
            .match_header("user-agent", "Resume-Tailor/1.0")
            .with_status(200)
            .with_body("<html><body><script>track()</script><h1>Rust   Developer</h1></body></html>")
            .create_async()
            .await;

        let fetcher = Fetcher::new(&FetchConfig::default()).expect("fetcher");
        let out = fetcher
            .normalize(
                &format!("{}/posting", server.url()),
                InputField::JobDescription,
            )
            .await
            .expect("fetch must succeed");

        mock.assert_async().await;
        assert_eq!(out, "Rust Developer");
    }

    #[tokio::test]
    async fn normalize_fails_on_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = Fetcher::new(&FetchConfig::default()).expect("fetcher");
        let err = fetcher
            .normalize(&format!("{}/gone", server.url()), InputField::Resume)
            .await
            .expect_err("404 must fail");

        match err {
            AppError::Fetch { field, detail } => {
                assert_eq!(field, InputField::Resume);
                assert!(detail.contains("404"), "detail was: {}", detail);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn normalize_fails_on_transport_error() {
        // Nothing listens on this port.
        let fetcher = Fetcher::new(&FetchConfig::default()).expect("fetcher");
        let err = fetcher
            .normalize("http://127.0.0.1:1/unreachable", InputField::JobDescription)
            .await
            .expect_err("connection must fail");
        assert!(matches!(
            err,
            AppError::Fetch {
                field: InputField::JobDescription,
                ..
            }
        ));
    }
}
