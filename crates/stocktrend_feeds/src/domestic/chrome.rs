//! Headless Chrome session for the listing scrape

use headless_chrome::{Browser, Element, LaunchOptions};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;

use super::{BrowserLauncher, ListingBrowser, ListingRow, COL_NAME};
use crate::error::FeedError;

/// Launches a fresh headless Chrome per scrape
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    chrome_path: Option<PathBuf>,
    window_size: (u32, u32),
    lang: String,
}

impl ChromeLauncher {
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self {
            chrome_path,
            window_size: (1920, 1080),
            lang: "ko_KR".to_string(),
        }
    }
}

impl BrowserLauncher for ChromeLauncher {
    fn launch(&self) -> Result<Box<dyn ListingBrowser>, FeedError> {
        let lang_arg = OsString::from(format!("--lang={}", self.lang));
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some(self.window_size))
            .path(self.chrome_path.clone())
            .args(vec![
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                lang_arg.as_os_str(),
            ])
            .build()
            .map_err(|e| FeedError::browser(format!("invalid launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| FeedError::browser(format!("failed to launch Chrome: {}", e)))?;

        tracing::debug!(source = "domestic", "Chrome session started");
        Ok(Box::new(ChromeSession { browser }))
    }
}

/// Owns the Chrome process; dropping it kills the browser.
struct ChromeSession {
    browser: Browser,
}

impl ListingBrowser for ChromeSession {
    fn load_table(
        &mut self,
        url: &str,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<ListingRow>, FeedError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| FeedError::browser(format!("failed to open tab: {}", e)))?;

        tab.navigate_to(url)
            .map_err(|e| FeedError::browser(format!("failed to load {}: {}", url, e)))?;

        let table = tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_| FeedError::TableTimeout {
                selector: selector.to_string(),
                secs: timeout.as_secs(),
            })?;

        let rows = table
            .find_elements("tr")
            .map_err(|e| FeedError::browser(format!("failed to list rows: {}", e)))?;

        let mut listing = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            match read_row(row) {
                Ok(parsed) => listing.push(parsed),
                Err(e) => {
                    tracing::warn!(source = "domestic", row = idx, error = %e, "Unreadable row");
                    listing.push(ListingRow::default());
                }
            }
        }

        Ok(listing)
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        tracing::debug!(source = "domestic", "Chrome session closed");
    }
}

fn read_row(row: &Element<'_>) -> Result<ListingRow, FeedError> {
    // Header rows use <th>; they come back with no cells.
    let cells = row.find_elements("td").unwrap_or_default();

    let mut texts = Vec::with_capacity(cells.len());
    for cell in &cells {
        let text = cell
            .get_inner_text()
            .map_err(|e| FeedError::browser(e.to_string()))?;
        texts.push(text);
    }

    let link_text = match cells.get(COL_NAME) {
        Some(name_cell) => name_cell
            .find_element("a")
            .ok()
            .and_then(|a| a.get_inner_text().ok()),
        None => None,
    };

    Ok(ListingRow {
        cells: texts,
        link_text,
    })
}
