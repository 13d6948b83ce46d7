//! Report upload processing
//!
//! Uploaded reports are handed to a [`ReportProcessor`]; its JSON output is
//! returned to the client unchanged.

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use thiserror::Error;

/// Report processing failure
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report processing failed: {0}")]
    Processing(String),
}

/// An accepted report upload
#[derive(Debug, Clone)]
pub struct ReportUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub description: Option<String>,
    pub data: Bytes,
}

/// Downstream handler for uploaded reports
#[async_trait]
pub trait ReportProcessor: Send + Sync {
    async fn process(&self, upload: ReportUpload) -> Result<Value, ReportError>;
}

/// Acknowledges uploads with a receipt
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptProcessor;

#[async_trait]
impl ReportProcessor for ReceiptProcessor {
    async fn process(&self, upload: ReportUpload) -> Result<Value, ReportError> {
        let report_id = uuid::Uuid::new_v4().to_string();

        tracing::info!(
            report_id = %report_id,
            filename = ?upload.filename,
            size_bytes = upload.data.len(),
            "Report received"
        );

        Ok(json!({
            "report_id": report_id,
            "filename": upload.filename,
            "content_type": upload.content_type,
            "size_bytes": upload.data.len(),
            "description": upload.description,
            "status": "received",
            "received_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }))
    }
}
