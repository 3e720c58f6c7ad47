use serde::Deserialize;
use uuid::Uuid;

use crate::domain::identifier::parse_id;
use crate::domain::month_year::MonthYear;
use crate::domain::subscription_filter::non_empty;
use crate::domain::validation_error::ValidationError;

#[derive(Debug, Deserialize)]
pub struct CostSummaryQuery {
    pub start_date: String,
    pub end_date: String,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

/// Inclusive window of months over which declared prices are summed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostSummaryPeriod {
    pub start: MonthYear,
    pub end: MonthYear,
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct CostSummary {
    pub total_price: i64,
}

impl TryFrom<CostSummaryQuery> for CostSummaryPeriod {
    type Error = ValidationError;

    fn try_from(query: CostSummaryQuery) -> Result<Self, Self::Error> {
        let start = MonthYear::parse(&query.start_date, "start_date")?;
        let end = MonthYear::parse(&query.end_date, "end_date")?;

        if start > end {
            return Err(ValidationError::new(
                "date_range",
                "start_date must be before or equal to end_date",
            ));
        }

        let user_id = non_empty(query.user_id)
            .map(|user_id| parse_id(&user_id, "user_id"))
            .transpose()?;

        Ok(CostSummaryPeriod {
            start,
            end,
            user_id,
            service_name: non_empty(query.service_name),
        })
    }
}
