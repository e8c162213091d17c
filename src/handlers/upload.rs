use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::error::UploadError;
use crate::router::NexusState;
use crate::service::UploadedFile;
use crate::service::upload::SUCCESS_MESSAGE;

/// Multipart field carrying the document images.
pub const FILES_FIELD: &str = "files";

/// POST /file/upload -> extract the identity document in the first two `files` parts and store it.
pub async fn upload_handler(
    State(state): State<NexusState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let files = match multipart {
        Ok(multipart) => read_files(multipart).await,
        Err(rejection) => Err(UploadError::InvalidUpload(rejection.body_text())),
    };
    let files = match files {
        Ok(files) => files,
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "malformed upload body");
            return err.into_response();
        }
    };

    match state.uploads.process(files).await {
        Ok(receipt) => Json(json!({
            "status": "success",
            "message": SUCCESS_MESSAGE,
            "record_id": receipt.record_id,
            "extracted_data": receipt.extracted_data,
            "filenames": receipt.filenames,
        }))
        .into_response(),
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "upload failed");
            err.into_response()
        }
    }
}

/// Collect `files` parts in order. Only the first two are buffered; later parts are skipped unread.
async fn read_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>, UploadError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        if files.len() >= 2 {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(invalid)?;
        files.push(UploadedFile { filename, bytes });
    }
    Ok(files)
}

fn invalid(e: MultipartError) -> UploadError {
    UploadError::InvalidUpload(e.body_text())
}
