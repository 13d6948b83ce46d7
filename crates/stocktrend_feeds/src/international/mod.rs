//! International ticker feed
//!
//! One entry per configured ticker, always in configured order. A ticker
//! that cannot be fetched still gets an entry with `N/A` values at its
//! position, unlike the domestic feed which drops bad rows.

pub mod yahoo;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;

use crate::config::InternationalConfig;
use crate::error::FeedError;
use crate::format::{format_change_pct, format_market_cap, format_usd_price};
use crate::model::{CompanyStockEntry, Country};
use crate::source::StockSource;

pub use yahoo::YahooProvider;

/// Descriptive fields for a ticker, as the provider reports them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerInfo {
    pub long_name: Option<String>,
    pub price: Option<f64>,
    /// Left untyped: providers occasionally send non-numeric values
    pub market_cap: Option<Value>,
}

/// Opens provider sessions
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn MarketSession>, FeedError>;
}

/// A session against the financial-data provider
#[async_trait]
pub trait MarketSession: Send + Sync {
    async fn ticker_info(&self, ticker: &str) -> Result<TickerInfo, FeedError>;

    /// Daily closes over the last `lookback_days`, oldest first
    async fn daily_closes(&self, ticker: &str, lookback_days: i64) -> Result<Vec<f64>, FeedError>;
}

/// Fetches the configured international tickers
pub struct InternationalSource {
    config: InternationalConfig,
    provider: Arc<dyn MarketDataProvider>,
}

impl InternationalSource {
    pub fn new(config: InternationalConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { config, provider }
    }

    /// Source backed by the Yahoo Finance HTTP API
    pub fn with_yahoo(config: InternationalConfig) -> Self {
        let provider = Arc::new(YahooProvider::new(&config));
        Self::new(config, provider)
    }

    fn placeholders(&self) -> Vec<CompanyStockEntry> {
        self.config
            .tickers
            .iter()
            .enumerate()
            .map(|(idx, ticker)| {
                CompanyStockEntry::placeholder(idx as u32 + 1, Country::International, ticker)
            })
            .collect()
    }
}

#[async_trait]
impl StockSource for InternationalSource {
    fn name(&self) -> &str {
        "international"
    }

    async fn fetch(&self) -> Vec<CompanyStockEntry> {
        let session = match self.provider.connect().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(source = "international", error = %e, "Provider unavailable");
                return self.placeholders();
            }
        };

        let lookups = self.config.tickers.iter().enumerate().map(|(idx, ticker)| {
            let session = session.as_ref();
            let lookback_days = self.config.lookback_days;
            async move {
                let rank = idx as u32 + 1;
                match fetch_ticker(session, ticker, rank, lookback_days).await {
                    Ok(entry) => {
                        tracing::info!(source = "international", ticker = %ticker, "Fetched ticker");
                        entry
                    }
                    Err(e) => {
                        tracing::error!(
                            source = "international",
                            ticker = %ticker,
                            error = %e,
                            "Ticker lookup failed, using placeholder"
                        );
                        CompanyStockEntry::placeholder(rank, Country::International, ticker)
                    }
                }
            }
        });

        let entries = join_all(lookups).await;
        tracing::info!(
            source = "international",
            count = entries.len(),
            "Fetched international game stocks"
        );
        entries
    }
}

async fn fetch_ticker(
    session: &dyn MarketSession,
    ticker: &str,
    rank: u32,
    lookback_days: i64,
) -> Result<CompanyStockEntry, FeedError> {
    let info = session.ticker_info(ticker).await?;
    let closes = session.daily_closes(ticker, lookback_days).await?;

    if closes.len() < 2 {
        tracing::warn!(source = "international", ticker = %ticker, "Not enough price history");
    }

    Ok(CompanyStockEntry {
        rank,
        country: Country::International,
        company: info.long_name.unwrap_or_else(|| ticker.to_string()),
        market_cap: format_market_cap(info.market_cap.as_ref()),
        price: format_usd_price(info.price),
        change: format_change_pct(&closes),
        announcement: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FakeSession {
        failing: &'static str,
    }

    #[async_trait]
    impl MarketSession for FakeSession {
        async fn ticker_info(&self, ticker: &str) -> Result<TickerInfo, FeedError> {
            if ticker == self.failing {
                return Err(FeedError::NoData(ticker.to_string()));
            }
            Ok(TickerInfo {
                long_name: Some(format!("{} Corp", ticker)),
                price: Some(100.0),
                market_cap: Some(json!(2.5e12)),
            })
        }

        async fn daily_closes(&self, _ticker: &str, _lookback_days: i64) -> Result<Vec<f64>, FeedError> {
            Ok(vec![100.0, 105.0])
        }
    }

    struct FakeProvider {
        failing: &'static str,
    }

    #[async_trait]
    impl MarketDataProvider for FakeProvider {
        async fn connect(&self) -> Result<Box<dyn MarketSession>, FeedError> {
            Ok(Box::new(FakeSession {
                failing: self.failing,
            }))
        }
    }

    struct DownProvider;

    #[async_trait]
    impl MarketDataProvider for DownProvider {
        async fn connect(&self) -> Result<Box<dyn MarketSession>, FeedError> {
            Err(FeedError::provider("connection refused"))
        }
    }

    fn config(tickers: &[&str]) -> InternationalConfig {
        InternationalConfig {
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_formats_entries_in_order() {
        let source = InternationalSource::new(
            config(&["TTWO", "NTES"]),
            Arc::new(FakeProvider { failing: "" }),
        );

        let entries = source.fetch().await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].company, "TTWO Corp");
        assert_eq!(entries[0].price, "$100.00");
        assert_eq!(entries[0].change, "+5.0%");
        assert_eq!(entries[0].market_cap, "$2.5T");
        assert_eq!(entries[0].country, Country::International);
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[1].company, "NTES Corp");
    }

    #[tokio::test]
    async fn test_failed_ticker_keeps_its_rank() {
        let source = InternationalSource::new(
            config(&["EA", "TTWO", "RBLX"]),
            Arc::new(FakeProvider { failing: "EA" }),
        );

        let entries = source.fetch().await;

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].company, "EA");
        assert_eq!(entries[0].price, "N/A");
        assert_eq!(entries[0].change, "N/A");
        assert_eq!(entries[0].market_cap, "N/A");
        assert_eq!(entries[1].company, "TTWO Corp");
        assert_eq!(entries[2].rank, 3);
    }

    #[tokio::test]
    async fn test_unreachable_provider_yields_placeholders() {
        let source = InternationalSource::new(config(&["EA", "TTWO"]), Arc::new(DownProvider));

        let entries = source.fetch().await;

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.price == "N/A"));
        assert_eq!(entries[1].company, "TTWO");
        assert_eq!(entries[1].rank, 2);
    }

    #[tokio::test]
    async fn test_missing_name_falls_back_to_ticker() {
        struct NamelessSession;

        #[async_trait]
        impl MarketSession for NamelessSession {
            async fn ticker_info(&self, _ticker: &str) -> Result<TickerInfo, FeedError> {
                Ok(TickerInfo::default())
            }

            async fn daily_closes(&self, _t: &str, _d: i64) -> Result<Vec<f64>, FeedError> {
                Ok(vec![42.0])
            }
        }

        let entry = fetch_ticker(&NamelessSession, "KNMCY", 9, 5).await.unwrap();

        assert_eq!(entry.company, "KNMCY");
        assert_eq!(entry.rank, 9);
        assert_eq!(entry.price, "N/A");
        assert_eq!(entry.change, "N/A");
        assert_eq!(entry.market_cap, "N/A");
    }
}
