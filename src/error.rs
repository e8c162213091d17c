use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Error as SqlxError;
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum NexusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Background task failed: {0}")]
    BlockingTask(#[from] tokio::task::JoinError),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Gemini API error {}: {}", .0.error.status, .0.error.message)]
    GeminiServerError(GeminiError),

    #[error("Model returned no text (finish reason: {0})")]
    EmptyModelResponse(String),

    #[error("Extracted data is not a JSON object")]
    NotAnObject,
}

/// Request-level outcome of a failed upload. Each variant is produced at the
/// step it names; none of them leaves a record behind.
#[derive(Debug, ThisError)]
pub enum UploadError {
    #[error("Please upload at least 2 images (front and back).")]
    TooFewImages,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Gemini/Processing error: {0}")]
    Extraction(NexusError),

    #[error("Database error: {}", database_detail(.0))]
    Persistence(NexusError),
}

impl UploadError {
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::TooFewImages | UploadError::InvalidUpload(_) => "validation",
            UploadError::Extraction(_) => "extraction",
            UploadError::Persistence(_) => "persistence",
        }
    }
}

// Avoid "Database error: Database error: ..." for sqlx failures.
fn database_detail(err: &NexusError) -> String {
    match err {
        NexusError::DatabaseError(inner) => inner.to_string(),
        other => other.to_string(),
    }
}

/// Error body of the upload endpoint. Sent with 200 OK; callers branch on `status`.
#[derive(Serialize)]
pub struct UploadErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> axum::response::Response {
        let body = UploadErrorBody {
            status: "error",
            message: self.to_string(),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// Gemini API error response structure
#[derive(Deserialize, Debug)]
pub struct GeminiError {
    pub error: GeminiErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct GeminiErrorBody {
    pub code: u32,
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl GeminiError {
    /// Decode an upstream error body; `None` when it does not follow the Gemini envelope.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_error_body_formats_status_and_message() {
        let body = br#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[]}}"#;
        let err = GeminiError::from_body(body).expect("gemini envelope");
        assert_eq!(err.error.code, 400);
        assert!(err.error.extra.contains_key("details"));
        assert_eq!(
            NexusError::GeminiServerError(err).to_string(),
            "Gemini API error INVALID_ARGUMENT: API key not valid."
        );
    }

    #[test]
    fn upload_error_messages_carry_their_prefix() {
        assert_eq!(
            UploadError::TooFewImages.to_string(),
            "Please upload at least 2 images (front and back)."
        );
        let db = UploadError::Persistence(NexusError::DatabaseError(sqlx::Error::RowNotFound));
        assert_eq!(db.kind(), "persistence");
        let msg = db.to_string();
        assert!(msg.starts_with("Database error: "));
        assert!(!msg.contains("Database error: Database error"));
        let ex = UploadError::Extraction(NexusError::NotAnObject);
        assert_eq!(
            ex.to_string(),
            "Gemini/Processing error: Extracted data is not a JSON object"
        );
    }

    #[test]
    fn non_envelope_body_is_not_a_gemini_error() {
        assert!(GeminiError::from_body(b"<html>bad gateway</html>").is_none());
        assert!(GeminiError::from_body(br#"{"message":"nope"}"#).is_none());
    }
}
