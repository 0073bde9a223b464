//! Label validation for row and column names

use crate::format::constants::MAX_LABEL_LEN;
use crate::PackError;

/// Validate a row or column label
///
/// Labels must be non-empty, at most [`MAX_LABEL_LEN`] bytes, and free of
/// NUL and control characters other than tab.
pub fn validate_label(label: &str) -> Result<(), PackError> {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(PackError::InvalidLabel);
    }

    if label.bytes().any(|b| b < 32 && b != b'\t') {
        return Err(PackError::InvalidLabel);
    }

    Ok(())
}

/// Validate a label list against a dimension: empty, or exactly `expected` long
pub fn validate_label_count(len: usize, expected: u32) -> Result<(), PackError> {
    if len != 0 && len != expected as usize {
        return Err(PackError::LabelCountMismatch);
    }
    Ok(())
}
