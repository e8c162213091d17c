use axum::body::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::ExtractionClient;
use crate::db::{NewIdentityRecord, RecordStore};
use crate::error::{NexusError, UploadError};
use crate::types::{DocumentImage, ExtractedFields};

pub const SUCCESS_MESSAGE: &str = "Data saved to database!";

/// One file part of an upload request, not yet decoded.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Successful upload: the new row id, what was read off the card, and which files were used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReceipt {
    pub record_id: i64,
    pub extracted_data: ExtractedFields,
    pub filenames: Vec<String>,
}

/// Upload pipeline: validate, decode, extract, normalize, persist.
///
/// Each step finishes before the next starts; the first failure ends the request.
pub struct UploadService {
    store: RecordStore,
    extractor: Arc<dyn ExtractionClient>,
}

impl UploadService {
    pub fn new(store: RecordStore, extractor: Arc<dyn ExtractionClient>) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Only the first two files are used (front, back); the rest are ignored.
    pub async fn process(&self, files: Vec<UploadedFile>) -> Result<UploadReceipt, UploadError> {
        if files.len() < 2 {
            warn!(count = files.len(), "upload rejected: fewer than two images");
            return Err(UploadError::TooFewImages);
        }

        let mut pair = files.into_iter().take(2);
        let (Some(front), Some(back)) = (pair.next(), pair.next()) else {
            return Err(UploadError::TooFewImages);
        };
        let filenames = vec![front.filename.clone(), back.filename.clone()];

        let front = decode_rgb(front).await.map_err(extraction_failed)?;
        let back = decode_rgb(back).await.map_err(extraction_failed)?;

        let fields = self
            .extractor
            .extract(&front, &back)
            .await
            .map_err(extraction_failed)?;

        let record = NewIdentityRecord::from(&fields);
        if record.date_of_birth.is_none() {
            info!(raw = %fields.date_of_birth, "date of birth not recognised; storing as unknown");
        }

        let record_id = self.store.insert(&record).await.map_err(|e| {
            warn!(error = %e, "failed to persist identity record");
            UploadError::Persistence(e)
        })?;

        info!(record_id, ?filenames, "identity record saved");
        Ok(UploadReceipt {
            record_id,
            extracted_data: fields,
            filenames,
        })
    }
}

fn extraction_failed(e: NexusError) -> UploadError {
    warn!(error = %e, "document extraction failed");
    UploadError::Extraction(e)
}

/// Decode any supported image format and convert it to 8-bit RGB off the async runtime.
async fn decode_rgb(file: UploadedFile) -> Result<DocumentImage, NexusError> {
    let UploadedFile { filename, bytes } = file;
    let pixels = tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes).map(|img| img.to_rgb8())
    })
    .await??;
    Ok(DocumentImage { filename, pixels })
}
