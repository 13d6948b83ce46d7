//! Common contract for stock sources

use async_trait::async_trait;

use crate::model::CompanyStockEntry;

/// A source of ranked company entries.
///
/// `fetch` never fails: each implementation degrades to fewer or
/// placeholder entries according to its own policy.
#[async_trait]
pub trait StockSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch the source's entries, ranked from 1
    async fn fetch(&self) -> Vec<CompanyStockEntry>;
}
