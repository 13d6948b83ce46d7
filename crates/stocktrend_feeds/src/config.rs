//! Feed configuration
//!
//! Deserialised from the `[feeds]` table of the server configuration file.
//! Every field has a default, so a partial table is valid.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default domestic listing page (game industry group)
pub const DEFAULT_LISTING_URL: &str =
    "https://finance.naver.com/sise/sise_group_detail.naver?type=upjong&no=263";

/// Default international tickers, in report order
pub const DEFAULT_TICKERS: [&str; 10] = [
    "EA", "TTWO", "NTES", "RBLX", "TCEHY", "UBSFY", "NTDOY", "NCBDY", "KNMCY", "SGAMY",
];

/// All feed settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub domestic: DomesticConfig,
    pub international: InternationalConfig,
    /// Company name -> announcement text
    pub announcements: HashMap<String, String>,
}

/// Domestic listing scrape settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DomesticConfig {
    /// Listing page URL
    pub url: String,
    /// CSS selector of the listing table
    pub table_selector: String,
    /// Leading table rows that are headers
    pub header_rows: usize,
    /// Rows with fewer data cells are blank separators
    pub min_columns: usize,
    /// How long to wait for the table to render
    pub wait_timeout_secs: u64,
    /// Chrome binary; auto-detected when unset
    pub chrome_path: Option<PathBuf>,
}

impl Default for DomesticConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LISTING_URL.to_string(),
            table_selector: "table.type_5".to_string(),
            header_rows: 2,
            min_columns: 10,
            wait_timeout_secs: 10,
            chrome_path: None,
        }
    }
}

impl DomesticConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

/// Shortest lookback that still yields two closes for a change figure
pub const MIN_LOOKBACK_DAYS: i64 = 2;

/// Longest lookback the chart window accepts
pub const MAX_LOOKBACK_DAYS: i64 = 3650;

/// International provider settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InternationalConfig {
    /// Tickers in report order
    pub tickers: Vec<String>,
    /// Calendar days of daily closes to request
    pub lookback_days: i64,
    /// Provider API base URL
    pub base_url: String,
    /// Page visited first to obtain session cookies
    pub cookie_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for InternationalConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            lookback_days: 5,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl InternationalConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether `lookback_days` lies within the accepted window
    pub fn lookback_in_range(&self) -> bool {
        (MIN_LOOKBACK_DAYS..=MAX_LOOKBACK_DAYS).contains(&self.lookback_days)
    }
}
