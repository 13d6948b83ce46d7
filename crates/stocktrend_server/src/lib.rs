//! REST API server for the game stock trend service
//!
//! Serves the aggregated domestic and international game stock report
//! and accepts PDF report uploads.

pub mod config;
pub mod error;
pub mod report;
pub mod routes;
pub mod server;

pub use stocktrend_feeds;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
