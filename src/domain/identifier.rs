use uuid::Uuid;

use crate::domain::validation_error::ValidationError;

/// Parses a textual UUID, tagging failures with `field` (`id`, `user_id`).
pub fn parse_id(value: &str, field: &'static str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ValidationError::new(field, format!("{} is not a valid UUID", value)))
}
