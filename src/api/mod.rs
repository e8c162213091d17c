//! Extraction seam: turn a front/back image pair into structured document fields.

pub mod gemini_api;

use async_trait::async_trait;

use crate::error::NexusError;
use crate::types::{DocumentImage, ExtractedFields};

pub use gemini_api::GeminiClient;

/// Instruction sent alongside the two document images.
pub const EXTRACTION_PROMPT: &str = r#"
Extract the following from these Aadhaar images and return as JSON:
{
    "full_name": "string",
    "gender": "string",
    "date_of_birth": "YYYY-MM-DD",
    "document_number": "string",
    "address": "string"
}
IMPORTANT: Return ONLY the raw JSON object. Use double quotes for keys and string values.
"#;

/// Capability to read document fields out of two images.
///
/// The production implementation is [`GeminiClient`]; tests substitute a canned double.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    async fn extract(
        &self,
        front: &DocumentImage,
        back: &DocumentImage,
    ) -> Result<ExtractedFields, NexusError>;
}
