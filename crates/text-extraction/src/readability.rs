//! Main-content extraction via the Readability heuristic (dom_smoothie).

use dom_smoothie::{Config, Readability};
use tracing::debug;

use crate::error::ContentError;

/// Strip navigation, ads and other boilerplate, returning the article body as
/// an HTML fragment.
///
/// `url` lets relative links in the article resolve to absolute ones.
pub fn extract_main_content(html: &str, url: Option<&str>) -> Result<String, ContentError> {
    if html.trim().is_empty() {
        return Err(ContentError::NoArticle);
    }

    // Default config leaves max_elements_to_parse at 0, i.e. unlimited.
    let mut readability = Readability::new(html, url, Some(Config::default()))
        .map_err(|err| ContentError::Readability(err.to_string()))?;
    let article = readability
        .parse()
        .map_err(|err| ContentError::Readability(err.to_string()))?;

    if article.text_content.trim().is_empty() {
        return Err(ContentError::NoArticle);
    }

    debug!(
        "Readability kept {} chars of text (title: {:?})",
        article.text_content.len(),
        article.title
    );

    Ok(article.content.to_string())
}
