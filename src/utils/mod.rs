//! Utility functions

pub mod crypto;
pub mod multipart;
pub mod time;

pub use crypto::generate_hex_id;
pub use multipart::{MultipartForm, UploadedFile};
pub use time::{now_utc, parse_datetime};
