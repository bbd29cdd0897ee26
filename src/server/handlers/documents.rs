//! Document processing endpoint.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use super::super::auth::RequireApiKey;
use super::super::error::ApiError;
use super::super::AppState;
use crate::ocr::OcrBudget;
use crate::services::Extraction;

/// Query params for document processing.
#[derive(Debug, Deserialize)]
pub struct ProcessDocumentQuery {
    /// URL of the document to fetch
    pub url: Option<String>,
    /// Character budget for extracted text
    pub max_chars: Option<i64>,
}

/// Download a document and extract its text.
/// GET /process-document?url=<URL>&max_chars=<int>
pub async fn process_document(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    query: Result<Query<ProcessDocumentQuery>, QueryRejection>,
) -> Result<Json<Extraction>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(ApiError::MissingParameter("url"))?;
    let budget = match params.max_chars {
        Some(n) => OcrBudget::new(n)?,
        None => {
            let default = i64::try_from(state.settings.default_max_chars).unwrap_or(i64::MAX);
            OcrBudget::new(default)?
        }
    };

    let bytes = state.http.download(&url).await?;
    tracing::info!(
        url = %url,
        bytes = bytes.len(),
        max_chars = budget.max_chars(),
        "Processing document"
    );

    let processor = state.processor.clone();
    let extraction = tokio::task::spawn_blocking(move || processor.process(&bytes, budget))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("extraction task failed: {}", e)))??;

    Ok(Json(extraction))
}
