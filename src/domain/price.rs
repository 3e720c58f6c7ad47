use crate::domain::validation_error::ValidationError;

/// Declared cost in minor currency units. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(i32);

impl Price {
    pub fn parse(amount: i64) -> Result<Price, ValidationError> {
        if amount < 0 {
            return Err(ValidationError::new("price", "must not be negative"));
        }

        i32::try_from(amount)
            .map(Self)
            .map_err(|_| ValidationError::new("price", format!("must not exceed {}", i32::MAX)))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}
