//! Route modules for the stocktrend server
//!
//! This module contains endpoint group-specific routers:
//! - stocks: Aggregated game stock report
//! - report: PDF report upload
//! - health: Health check and monitoring endpoints
//!
//! Stock and report routes are nested under the configured API prefix;
//! health routes stay at the root for load balancers.

pub mod health;
pub mod report;
pub mod stocks;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use stocktrend_feeds::Aggregator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::report::{ReceiptProcessor, ReportProcessor};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
    /// Builds the stock report
    pub aggregator: Arc<Aggregator>,
    /// Handles accepted report uploads
    pub reports: Arc<dyn ReportProcessor>,
}

impl AppState {
    /// Create a new AppState wired to the live sources
    pub fn new(config: Arc<ServerConfig>) -> Self {
        let aggregator = Aggregator::from_config(&config.feeds);
        Self::with_services(config, aggregator, Arc::new(ReceiptProcessor))
    }

    /// Create an AppState with explicit collaborators
    pub fn with_services(
        config: Arc<ServerConfig>,
        aggregator: Aggregator,
        reports: Arc<dyn ReportProcessor>,
    ) -> Self {
        Self {
            config,
            start_time: std::time::Instant::now(),
            aggregator: Arc::new(aggregator),
            reports,
        }
    }
}

/// Build the main application router from the configuration
pub fn build_router(config: Arc<ServerConfig>) -> Router {
    build_router_with_state(AppState::new(config))
}

/// Build the main application router by merging all route modules
pub fn build_router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(stocks::routes())
        .merge(report::routes());

    Router::new()
        .merge(health::routes())
        .nest(&state.config.api_prefix, api_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_build_router_creates_valid_router() {
        let router = build_router_with_state(test_state());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stock_routes_are_nested_under_prefix() {
        let router = build_router_with_state(test_state());

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/stocktrend/stocks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::builder().uri("/stocks").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let mut config = ServerConfig::default();
        config.api_prefix = "/v2".to_string();
        let state = AppState::with_services(
            Arc::new(config),
            aggregator(vec![], vec!["EA"]),
            Arc::new(CountingProcessor::default()),
        );
        let router = build_router_with_state(state);

        let response = router
            .oneshot(Request::builder().uri("/v2/stocks").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let router = build_router_with_state(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/unknown/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let router = build_router_with_state(test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://dashboard.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }

    #[test]
    fn test_app_state_config_access() {
        let mut config = ServerConfig::default();
        config.port = 9999;
        let state = AppState::new(Arc::new(config));

        assert_eq!(state.config.port, 9999);
    }
}
