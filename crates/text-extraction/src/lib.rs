//! Text extraction for compliance checks
//!
//! Fetches a page, keeps only its main content and flattens that to plain
//! text with section markers:
//!
//! 1. [`fetch`] - raw HTML over HTTP (or any [`HtmlFetcher`])
//! 2. [`readability`] - boilerplate removal
//! 3. [`convert`] - HTML to text with `[Section: ...]` markers

pub mod convert;
pub mod error;
pub mod fetch;
pub mod readability;

use std::sync::Arc;

use compliance_types::DocumentRole;
use tracing::debug;
use url::Url;

pub use convert::html_to_text_with_sections;
pub use error::{ContentError, ExtractionError, FetchError};
pub use fetch::{FetchConfig, HtmlFetcher, HttpFetcher};
pub use readability::extract_main_content;

/// Extracts section-annotated text for the policy and webpage documents.
#[derive(Clone)]
pub struct TextExtractor {
    fetcher: Arc<dyn HtmlFetcher>,
}

impl TextExtractor {
    pub fn new(fetcher: Arc<dyn HtmlFetcher>) -> Self {
        Self { fetcher }
    }

    /// Extractor using a real HTTP client.
    pub fn http(config: FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(Arc::new(HttpFetcher::new(config)?)))
    }

    pub async fn extract_policy_text(&self, policy_url: &Url) -> Result<String, ExtractionError> {
        self.extract(DocumentRole::Policy, policy_url).await
    }

    pub async fn extract_webpage_text(&self, webpage_url: &Url) -> Result<String, ExtractionError> {
        self.extract(DocumentRole::Webpage, webpage_url).await
    }

    async fn extract(&self, role: DocumentRole, url: &Url) -> Result<String, ExtractionError> {
        let html = self
            .fetcher
            .fetch_html(url)
            .await
            .map_err(|source| ExtractionError::Network {
                role,
                url: url.clone(),
                source,
            })?;

        let text = extract_text_from_html(&html, url).map_err(|source| ExtractionError::Content {
            role,
            url: url.clone(),
            source,
        })?;

        debug!("Extracted {} chars of {} text from {}", text.len(), role, url);
        Ok(text)
    }
}

/// Readability + section-marker conversion for already-fetched HTML.
pub fn extract_text_from_html(html: &str, url: &Url) -> Result<String, ContentError> {
    let main_content = extract_main_content(html, Some(url.as_str()))?;
    html_to_text_with_sections(&main_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Serves canned bodies; unknown URLs fail like a refused connection.
    struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl HtmlFetcher for StaticFetcher {
        async fn fetch_html(&self, url: &Url) -> Result<String, FetchError> {
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Transport {
                    url: url.clone(),
                    reason: "connection refused".to_string(),
                })
        }
    }

    fn extractor(pages: &[(&str, &str)]) -> TextExtractor {
        let pages = pages
            .iter()
            .map(|(url, html)| (url.to_string(), html.to_string()))
            .collect();
        TextExtractor::new(Arc::new(StaticFetcher { pages }))
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    fn policy_page() -> String {
        let clause = "Advertisements must not promise guaranteed results, must disclose \
            every material fee next to the advertised price, and must not imply \
            endorsement by any public authority. Testimonials require a visible note \
            that individual results vary.";
        format!(
            "<html><head><title>Advertising policy</title></head><body>\
             <nav><a href=\"/\">Home</a> <a href=\"/about\">About</a></nav>\
             <article><h2>Claims</h2><p>{c}</p><p>{c}</p><h3>Fees</h3><p>{c}</p><p>{c}</p></article>\
             </body></html>",
            c = clause
        )
    }

    #[tokio::test]
    async fn test_policy_text_is_extracted() {
        let page = policy_page();
        let extractor = extractor(&[("https://example.com/policy", &page)]);

        let text = extractor
            .extract_policy_text(&url("https://example.com/policy"))
            .await
            .unwrap();

        assert!(text.contains("must not promise guaranteed results"));
        assert!(text.contains("[Subsubsection: Fees]"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let extractor = extractor(&[]);
        let err = extractor
            .extract_webpage_text(&url("https://example.com/page"))
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert_eq!(err.role(), DocumentRole::Webpage);
        assert_eq!(
            err.to_string(),
            "Network error fetching webpage from https://example.com/page: \
             Failed to fetch HTML from https://example.com/page: connection refused"
        );
    }

    #[tokio::test]
    async fn test_empty_page_is_content_error() {
        let extractor = extractor(&[("https://example.com/policy", "")]);
        let err = extractor
            .extract_policy_text(&url("https://example.com/policy"))
            .await
            .unwrap_err();

        assert!(!err.is_network());
        assert_eq!(
            err,
            ExtractionError::Content {
                role: DocumentRole::Policy,
                url: url("https://example.com/policy"),
                source: ContentError::NoArticle,
            }
        );
        assert_eq!(
            err.to_string(),
            "Failed to extract policy from https://example.com/policy: Failed to extract main content"
        );
    }

    #[tokio::test]
    async fn test_same_input_same_text() {
        let page = policy_page();
        let extractor = extractor(&[("https://example.com/policy", &page)]);
        let target = url("https://example.com/policy");

        let first = extractor.extract_policy_text(&target).await.unwrap();
        let second = extractor.extract_policy_text(&target).await.unwrap();
        assert_eq!(first, second);
    }
}
