//! Yahoo Finance provider
//!
//! Yahoo's unofficial API wants a session cookie and a crumb token. Both
//! are obtained once per session; a missing crumb is not fatal, the
//! individual lookups will simply fail and fall back to placeholders.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{MarketDataProvider, MarketSession, TickerInfo};
use crate::config::InternationalConfig;
use crate::error::FeedError;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Opens cookie-backed sessions against the Yahoo Finance API
#[derive(Debug, Clone)]
pub struct YahooProvider {
    base_url: String,
    cookie_url: String,
    timeout: std::time::Duration,
}

impl YahooProvider {
    pub fn new(config: &InternationalConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_url: config.cookie_url.clone(),
            timeout: config.request_timeout(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn connect(&self) -> Result<Box<dyn MarketSession>, FeedError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;

        // The cookie page answers 404 but still sets the session cookie.
        if let Err(e) = client.get(&self.cookie_url).send().await {
            tracing::debug!(source = "international", error = %e, "Cookie request failed");
        }

        let crumb = fetch_crumb(&client, &self.base_url).await;
        if crumb.is_none() {
            tracing::warn!(source = "international", "No crumb obtained, continuing without one");
        }

        Ok(Box::new(YahooSession {
            client,
            base_url: self.base_url.clone(),
            crumb,
        }))
    }
}

async fn fetch_crumb(client: &reqwest::Client, base_url: &str) -> Option<String> {
    let response = client
        .get(format!("{}/v1/test/getcrumb", base_url))
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;
    let crumb = response.text().await.ok()?;
    let crumb = crumb.trim();
    (!crumb.is_empty()).then(|| crumb.to_string())
}

struct YahooSession {
    client: reqwest::Client,
    base_url: String,
    crumb: Option<String>,
}

impl YahooSession {
    fn get(&self, url: String, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url).query(params);
        if let Some(crumb) = &self.crumb {
            request = request.query(&[("crumb", crumb)]);
        }
        request
    }
}

#[async_trait]
impl MarketSession for YahooSession {
    async fn ticker_info(&self, ticker: &str) -> Result<TickerInfo, FeedError> {
        let url = format!("{}/v7/finance/quote", self.base_url);
        let body: QuoteEnvelope = self
            .get(url, &[("symbols", ticker.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let quote = body
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| FeedError::NoData(ticker.to_string()))?;

        Ok(TickerInfo {
            long_name: quote.long_name,
            price: quote.regular_market_price,
            market_cap: quote.market_cap,
        })
    }

    async fn daily_closes(&self, ticker: &str, lookback_days: i64) -> Result<Vec<f64>, FeedError> {
        let end = Utc::now();
        let start = Duration::try_days(lookback_days)
            .filter(|d| *d > Duration::zero())
            .and_then(|d| end.checked_sub_signed(d))
            .ok_or_else(|| {
                FeedError::provider(format!("Invalid lookback of {} days", lookback_days))
            })?;
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let body: ChartEnvelope = self
            .get(
                url,
                &[
                    ("period1", start.timestamp().to_string()),
                    ("period2", end.timestamp().to_string()),
                    ("interval", "1d".to_string()),
                ],
            )
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = body.chart.error {
            return Err(FeedError::provider(format!(
                "{}: {}",
                error.code,
                error.description.unwrap_or_default()
            )));
        }

        let closes = body
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|r| r.indicators.quote.into_iter().next())
            .map(|q| q.close.into_iter().flatten().collect())
            .unwrap_or_default();

        Ok(closes)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteEnvelope {
    quote_response: QuoteResponse,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<QuoteResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResult {
    long_name: Option<String>,
    regular_market_price: Option<f64>,
    market_cap: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartResponse,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}
