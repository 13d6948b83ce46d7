//! Game-industry stock feeds
//!
//! Adapter layer of the stocktrend service: fetches domestic listings by
//! scraping a finance portal, international tickers from a market-data
//! API, and merges both into a single ranked report.
//!
//! # Modules
//!
//! - [`domestic`] - headless-browser scrape of the domestic listing
//! - [`international`] - per-ticker provider lookups
//! - [`announcement`] - company announcement lookup
//! - [`aggregator`] - concurrent fetch and merge into a report envelope

pub mod aggregator;
pub mod announcement;
pub mod config;
pub mod domestic;
pub mod error;
pub mod format;
pub mod international;
pub mod model;
pub mod source;

pub use aggregator::Aggregator;
pub use announcement::{AnnouncementLookup, StaticAnnouncements};
pub use config::{DomesticConfig, FeedsConfig, InternationalConfig};
pub use domestic::DomesticSource;
pub use error::FeedError;
pub use international::InternationalSource;
pub use model::{CompanyStockEntry, Country, StockReportEnvelope, NOT_AVAILABLE};
pub use source::StockSource;
