//! Upload validation

use super::{fields, FieldErrors};

/// General rules for a stored file
pub fn validate(filename: &str, content_type: &str, size: usize, max_size: usize) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require(fields::FILENAME, filename, "Filename");
    errors.require(fields::CONTENT_TYPE, content_type, "ContentType");
    if size == 0 {
        errors.add(fields::FILE, "Size can not be blank.");
    } else if size > max_size {
        errors.add(fields::FILE, format!("File too large (max {})", human_size(max_size)));
    }
    errors
}

/// Rules for a project image: size and an `image/*` content type
pub fn validate_image(content_type: &str, size: usize, max_size: usize) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if size > max_size {
        errors.add(fields::IMAGE, format!("Image too large (max {})", human_size(max_size)));
    } else if content_type.is_empty() || !content_type.starts_with("image/") {
        errors.add(fields::IMAGE, "Invalid image file");
    }
    errors
}

/// "10MB" style rendering of a byte limit
pub fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}
