//! Report upload endpoint
//!
//! Accepts a multipart form with a `file` part and an optional
//! `description`. Only PDF uploads reach the report processor; anything
//! else is answered with an inline error object.

use axum::{
    extract::{Multipart, Query, State},
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::error::ApiError;
use crate::report::ReportUpload;

/// Content type a report upload must declare
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Inline error returned for non-PDF uploads
pub const ONLY_PDF_MESSAGE: &str = "Only PDF files are allowed";

/// Optional query parameters of the upload
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub description: Option<String>,
}

/// Build the report routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/report", post(upload_report))
}

/// POST /report - Upload a PDF report
async fn upload_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut upload: Option<ReportUpload> = None;
    let mut description = query.description;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Unprocessable(e.to_string()))?;
                upload = Some(ReportUpload {
                    filename,
                    content_type,
                    description: None,
                    data,
                });
            }
            "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Unprocessable(e.to_string()))?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    let Some(mut upload) = upload else {
        return Err(ApiError::Unprocessable(
            "Missing required form field: file".to_string(),
        ));
    };

    if upload.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
        tracing::warn!(
            filename = ?upload.filename,
            content_type = ?upload.content_type,
            "Rejected non-PDF report upload"
        );
        return Ok(Json(json!({ "error": ONLY_PDF_MESSAGE })));
    }

    upload.description = description;
    let result = state.reports.process(upload).await?;
    Ok(Json(result))
}
