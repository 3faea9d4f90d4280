//! Custom `validator` rules shared by the DTOs.

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is trimmed.
///
/// Services store trimmed text, so `length(min = 1)` alone would let
/// `"   "` through as an empty string.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}
