//! Media handling: image persistence, capture-time metadata, MIME
//! detection, and HTTP serving of stored images.

pub mod capture_time;
pub mod media_server;
pub mod mime_detect;
pub mod store;

pub use capture_time::capture_time;
pub use media_server::media_router;
pub use mime_detect::{detect_mime_type, image_extension, is_inline_safe};
pub use store::ImageStore;
