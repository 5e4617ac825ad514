//! Error types for text extraction

use compliance_types::DocumentRole;
use thiserror::Error;
use url::Url;

/// Failures while retrieving raw HTML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to fetch HTML from {url}: {reason}")]
    Transport { url: Url, reason: String },

    #[error("Failed to fetch HTML from {url}: server responded with status {status}")]
    Status { url: Url, status: u16 },

    #[error("Failed to fetch HTML from {url}: response is not HTML ({content_type})")]
    NotHtml { url: Url, content_type: String },
}

/// Failures while turning fetched HTML into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Failed to extract main content")]
    NoArticle,

    #[error("Failed to extract main content: {0}")]
    Readability(String),

    #[error("Failed to convert HTML to text: {0}")]
    Conversion(String),
}

/// A failed extraction, tagged with the document it was for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Network error fetching {role} from {url}: {source}")]
    Network {
        role: DocumentRole,
        url: Url,
        #[source]
        source: FetchError,
    },

    #[error("Failed to extract {role} from {url}: {source}")]
    Content {
        role: DocumentRole,
        url: Url,
        #[source]
        source: ContentError,
    },
}

impl ExtractionError {
    pub fn role(&self) -> DocumentRole {
        match self {
            ExtractionError::Network { role, .. } | ExtractionError::Content { role, .. } => *role,
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            ExtractionError::Network { url, .. } | ExtractionError::Content { url, .. } => url,
        }
    }

    /// True when the upstream could not be reached or refused to serve HTML.
    pub fn is_network(&self) -> bool {
        matches!(self, ExtractionError::Network { .. })
    }
}
