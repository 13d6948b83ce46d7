//! Domestic listing scrape
//!
//! The listing page is rendered in a headless browser, the table rows are
//! read back as plain cell text, and [`parse_listing_rows`] turns them into
//! ranked entries. Browser work is blocking and runs on tokio's blocking
//! pool; any failure there degrades to an empty result.
//!
//! Rows that cannot be parsed are skipped, never replaced by placeholders.

pub mod chrome;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DomesticConfig;
use crate::error::FeedError;
use crate::format::{format_domestic_change, format_trading_value};
use crate::model::{CompanyStockEntry, Country, NOT_AVAILABLE};
use crate::source::StockSource;

pub use chrome::ChromeLauncher;

const COL_NAME: usize = 0;
const COL_PRICE: usize = 1;
const COL_CHANGE: usize = 2;
const COL_CHANGE_PCT: usize = 3;
const COL_TRADING_VALUE: usize = 6;

/// One `<tr>` of the listing table as rendered text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRow {
    /// Text of every `<td>` in the row
    pub cells: Vec<String>,
    /// Text of the company link in the first cell, if there is one
    pub link_text: Option<String>,
}

/// Starts browser sessions.
pub trait BrowserLauncher: Send + Sync {
    fn launch(&self) -> Result<Box<dyn ListingBrowser>, FeedError>;
}

/// A live browser session.
///
/// Dropping the session must shut the browser down.
pub trait ListingBrowser {
    /// Navigate to `url`, wait up to `timeout` for `selector`, and return
    /// the table's rows in document order.
    fn load_table(
        &mut self,
        url: &str,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<ListingRow>, FeedError>;
}

/// Scrapes the domestic game-industry listing
pub struct DomesticSource {
    config: DomesticConfig,
    launcher: Arc<dyn BrowserLauncher>,
}

impl DomesticSource {
    pub fn new(config: DomesticConfig, launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self { config, launcher }
    }

    /// Source driving a local headless Chrome
    pub fn with_chrome(config: DomesticConfig) -> Self {
        let launcher = Arc::new(ChromeLauncher::new(config.chrome_path.clone()));
        Self::new(config, launcher)
    }
}

#[async_trait]
impl StockSource for DomesticSource {
    fn name(&self) -> &str {
        "domestic"
    }

    async fn fetch(&self) -> Vec<CompanyStockEntry> {
        let launcher = self.launcher.clone();
        let config = self.config.clone();

        let scraped =
            tokio::task::spawn_blocking(move || scrape_listing(launcher.as_ref(), &config)).await;

        let rows = match scraped {
            Ok(Ok(rows)) => rows,
            Ok(Err(e)) => {
                tracing::error!(source = "domestic", error = %e, "Listing scrape failed");
                return Vec::new();
            }
            Err(e) => {
                tracing::error!(source = "domestic", error = %e, "Listing scrape task aborted");
                return Vec::new();
            }
        };

        let entries = parse_listing_rows(&rows, &self.config);
        if entries.is_empty() {
            tracing::warn!(source = "domestic", "No domestic game stocks found");
        } else {
            tracing::info!(
                source = "domestic",
                count = entries.len(),
                "Fetched domestic game stocks"
            );
        }
        entries
    }
}

/// Run one browser session against the listing page.
///
/// The session is dropped, and the browser closed, before this returns.
fn scrape_listing(
    launcher: &dyn BrowserLauncher,
    config: &DomesticConfig,
) -> Result<Vec<ListingRow>, FeedError> {
    let mut browser = launcher.launch()?;
    browser.load_table(&config.url, &config.table_selector, config.wait_timeout())
}

/// Turn raw table rows into ranked domestic entries.
///
/// The first `header_rows` rows are skipped, rows with fewer than
/// `min_columns` cells are separators, and rows without a company link are
/// logged and dropped. A row's rank is its position after the headers, so
/// skipped rows leave gaps.
pub fn parse_listing_rows(rows: &[ListingRow], config: &DomesticConfig) -> Vec<CompanyStockEntry> {
    let mut entries = Vec::new();

    for (idx, row) in rows.iter().enumerate().skip(config.header_rows) {
        if row.cells.len() < config.min_columns {
            continue;
        }

        let company = match row.link_text.as_deref().map(str::trim) {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!(source = "domestic", row = idx, "Row has no company link, skipping");
                continue;
            }
        };

        let price = match cell(row, COL_PRICE) {
            "" => NOT_AVAILABLE.to_string(),
            p => p.to_string(),
        };

        tracing::debug!(source = "domestic", company = %company, "Parsed listing row");

        entries.push(CompanyStockEntry {
            rank: (idx - config.header_rows + 1) as u32,
            country: Country::Domestic,
            company,
            market_cap: format_trading_value(cell(row, COL_TRADING_VALUE)),
            price,
            change: format_domestic_change(cell(row, COL_CHANGE), cell(row, COL_CHANGE_PCT)),
            announcement: None,
        });
    }

    entries
}

fn cell(row: &ListingRow, col: usize) -> &str {
    row.cells.get(col).map(|c| c.trim()).unwrap_or("")
}
