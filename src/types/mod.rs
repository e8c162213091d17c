pub mod extraction;
pub mod gemini;

pub use extraction::{DocumentImage, ExtractedFields};
