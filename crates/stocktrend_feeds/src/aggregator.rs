//! Report aggregation
//!
//! Runs both sources concurrently and merges them, domestic first. Each
//! source owns its failure policy, so nothing here filters or retries.

use std::sync::Arc;

use crate::announcement::{AnnouncementLookup, StaticAnnouncements};
use crate::config::FeedsConfig;
use crate::domestic::DomesticSource;
use crate::error::FeedError;
use crate::international::InternationalSource;
use crate::model::StockReportEnvelope;
use crate::source::StockSource;

/// Builds the combined stock report
#[derive(Clone)]
pub struct Aggregator {
    domestic: Arc<dyn StockSource>,
    international: Arc<dyn StockSource>,
    announcements: Arc<dyn AnnouncementLookup>,
}

impl Aggregator {
    pub fn new(
        domestic: Arc<dyn StockSource>,
        international: Arc<dyn StockSource>,
        announcements: Arc<dyn AnnouncementLookup>,
    ) -> Self {
        Self {
            domestic,
            international,
            announcements,
        }
    }

    /// Aggregator wired to the live Chrome scrape and Yahoo provider
    pub fn from_config(config: &FeedsConfig) -> Self {
        Self::new(
            Arc::new(DomesticSource::with_chrome(config.domestic.clone())),
            Arc::new(InternationalSource::with_yahoo(config.international.clone())),
            Arc::new(StaticAnnouncements::new(config.announcements.clone())),
        )
    }

    /// Fetch both sources, attach announcements, and wrap the result.
    pub async fn build_report(&self) -> Result<StockReportEnvelope, FeedError> {
        let (domestic, international) =
            tokio::join!(self.domestic.fetch(), self.international.fetch());

        tracing::debug!(
            "Sources fetched: {} = {}, {} = {}",
            self.domestic.name(),
            domestic.len(),
            self.international.name(),
            international.len()
        );

        let mut companies = domestic;
        companies.extend(international);

        for entry in &mut companies {
            entry.announcement = self.announcements.lookup(&entry.company).await?;
            if entry.announcement.is_some() {
                tracing::debug!(
                    country = %entry.country,
                    company = %entry.company,
                    "Announcement attached"
                );
            }
        }

        Ok(StockReportEnvelope::new(companies))
    }
}
