//! Rules for caller-chosen collection names (save/load/export/report).
//!
//! Names become file stems on the authority, so they are restricted to a
//! single path component.

use crate::error::CoreError;

/// Maximum length of a collection name, in characters.
pub const MAX_NAME_LENGTH: usize = 128;

/// Validate a collection name and return it trimmed.
pub fn validate_collection_name(name: &str) -> Result<&str, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("file name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "file name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    if trimmed.contains(['/', '\\']) || trimmed.contains("..") || trimmed.contains('\0') {
        return Err(CoreError::Validation(format!(
            "file name '{trimmed}' must not contain path separators"
        )));
    }
    Ok(trimmed)
}
