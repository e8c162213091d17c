pub mod hello;
pub mod static_files;
pub mod upload;

pub use hello::hello_handler;
pub use static_files::static_handler;
pub use upload::upload_handler;
