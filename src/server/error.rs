//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::http_client::DownloadError;
use crate::ocr::InvalidBudget;
use crate::services::ProcessError;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not validate API key")]
    Forbidden,

    #[error("Missing required query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Error processing document: {0}")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::MissingParameter(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DownloadError> for ApiError {
    fn from(e: DownloadError) -> Self {
        ApiError::BadRequest(format!("Error downloading file: {}", e))
    }
}

impl From<InvalidBudget> for ApiError {
    fn from(e: InvalidBudget) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<ProcessError> for ApiError {
    fn from(e: ProcessError) -> Self {
        match e {
            ProcessError::EmptyDocument | ProcessError::Unsupported { .. } => {
                ApiError::BadRequest(e.to_string())
            }
            other => ApiError::Internal(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(err) => tracing::error!("Error processing document: {:?}", err),
            ApiError::Forbidden => tracing::warn!("Rejected request with missing or invalid API key"),
            other => tracing::info!(status = status.as_u16(), "Rejected request: {}", other),
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::MissingParameter("url").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ProcessError::EmptyDocument).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ProcessError::MalformedDocument("no xref".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unsupported_message_names_mime() {
        let err = ApiError::from(ProcessError::Unsupported {
            mime: "application/zip".into(),
        });
        assert_eq!(err.to_string(), "Unsupported file type: application/zip");
    }
}
