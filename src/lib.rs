pub mod api;
pub mod config;
pub mod date;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;

pub use api::{ExtractionClient, GeminiClient};
pub use date::normalize_date;
pub use db::RecordStore;
pub use error::{NexusError, UploadError};
pub use service::UploadService;
