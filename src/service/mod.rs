pub mod upload;

pub use upload::{UploadReceipt, UploadService, UploadedFile};
