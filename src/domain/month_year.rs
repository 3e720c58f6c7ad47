use chrono::{Datelike, NaiveDate};
use std::fmt;

use crate::domain::validation_error::ValidationError;

/// Calendar month, written `MM-YYYY` on the wire and stored as the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn parse(value: &str, field: &'static str) -> Result<MonthYear, ValidationError> {
        let invalid = || {
            ValidationError::new(
                field,
                format!("{} is not a valid date, expected MM-YYYY", value),
            )
        };

        let (month, year) = value.trim().split_once('-').ok_or_else(invalid)?;
        let is_well_formed = month.len() == 2
            && year.len() == 4
            && month.chars().chain(year.chars()).all(|c| c.is_ascii_digit());

        if !is_well_formed {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.0.month(), self.0.year())
    }
}

impl serde::Serialize for MonthYear {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
