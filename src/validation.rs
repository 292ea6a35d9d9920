// Validation utilities module
// Custom validation functions shared by request DTOs

use validator::ValidationError;

/// Validates that a string contains at least one non-whitespace character
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}
