//! Error types for the stock feeds.

use thiserror::Error;

/// Feed error type
#[derive(Debug, Error)]
pub enum FeedError {
    /// Browser could not be launched or driven
    #[error("Browser error: {0}")]
    Browser(String),

    /// Listing table never appeared on the page
    #[error("Timed out after {secs}s waiting for `{selector}`")]
    TableTimeout { selector: String, secs: u64 },

    /// Provider responded, but not with usable data
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider has nothing for the ticker
    #[error("No data for ticker {0}")]
    NoData(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Announcement backend failure
    #[error("Announcement lookup failed: {0}")]
    Announcement(String),
}

impl FeedError {
    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create an announcement error
    pub fn announcement(msg: impl Into<String>) -> Self {
        Self::Announcement(msg.into())
    }
}
