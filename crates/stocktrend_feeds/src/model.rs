//! Response data model
//!
//! Every displayed value is pre-formatted into a string before it lands
//! here; no numeric type survives past the sources.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for any value a source could not produce
pub const NOT_AVAILABLE: &str = "N/A";

/// Market a company is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Domestic,
    International,
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Country::Domestic => write!(f, "domestic"),
            Country::International => write!(f, "international"),
        }
    }
}

/// One company row of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyStockEntry {
    /// 1-based position within the producing source
    pub rank: u32,
    pub country: Country,
    pub company: String,
    #[serde(rename = "marketCap")]
    pub market_cap: String,
    pub price: String,
    pub change: String,
    pub announcement: Option<String>,
}

impl CompanyStockEntry {
    /// Entry for a company whose data could not be fetched
    pub fn placeholder(rank: u32, country: Country, company: impl Into<String>) -> Self {
        Self {
            rank,
            country,
            company: company.into(),
            market_cap: NOT_AVAILABLE.to_string(),
            price: NOT_AVAILABLE.to_string(),
            change: NOT_AVAILABLE.to_string(),
            announcement: None,
        }
    }
}

/// Top-level `/stocks` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReportEnvelope {
    pub companies: Vec<CompanyStockEntry>,
    pub total_count: usize,
    pub timestamp: String,
}

impl StockReportEnvelope {
    /// Wrap the entries, stamping the count and the current UTC instant.
    pub fn new(companies: Vec<CompanyStockEntry>) -> Self {
        Self {
            total_count: companies.len(),
            companies,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}
