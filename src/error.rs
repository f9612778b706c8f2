//! Error types for RateYourMusic operations.

use thiserror::Error;

/// Main error type for all RateYourMusic operations.
#[derive(Debug, Error)]
pub enum RymError {
    /// The remote returned a non-success status code.
    #[error("Request failed with status code {0}")]
    RequestFailed(u16),

    /// The page loaded but a field required for this entity type was missing.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A paginated collection has no entries, or no further pages.
    #[error("No content: {0}")]
    NoContent(String),

    /// An upgrade was requested on a reference without a stored URL.
    #[error("No URL is associated with this entity")]
    NoUrl,

    /// The HTTP transport failed before a status was available.
    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for RateYourMusic operations.
pub type Result<T> = std::result::Result<T, RymError>;
