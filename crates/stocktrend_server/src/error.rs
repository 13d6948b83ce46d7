//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use stocktrend_feeds::FeedError;
use thiserror::Error;

use crate::report::ReportError;

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Handler error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Aggregation failed
    #[error("{0}")]
    Feed(#[from] FeedError),

    /// Report collaborator failed
    #[error("{0}")]
    Report(#[from] ReportError),

    /// Request was well-formed HTTP but unusable
    #[error("{0}")]
    Unprocessable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Feed(_) | ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorDetail {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
