use unicode_segmentation::UnicodeSegmentation;

use crate::domain::validation_error::ValidationError;

const MAX_CHAR_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn parse(name: String) -> Result<ServiceName, ValidationError> {
        let name = name.trim().to_string();

        if name.is_empty() {
            return Err(ValidationError::new("service_name", "must not be empty"));
        }

        if name.graphemes(true).count() > MAX_CHAR_LENGTH {
            return Err(ValidationError::new(
                "service_name",
                format!("must be at most {} characters long", MAX_CHAR_LENGTH),
            ));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
