use serde::Deserialize;
use uuid::Uuid;

use crate::domain::identifier::parse_id;
use crate::domain::month_year::MonthYear;
use crate::domain::validation_error::ValidationError;

pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionListQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Listing criteria. `limit` and `offset` only take effect when greater than zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_date: Option<MonthYear>,
    pub end_date: Option<MonthYear>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for SubscriptionFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            service_name: None,
            start_date: None,
            end_date: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Query strings carry `?user_id=` as an empty value; treat it as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Makes `value` match itself literally inside a `LIKE`/`ILIKE` pattern.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for character in value.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }

    escaped
}

impl TryFrom<SubscriptionListQuery> for SubscriptionFilter {
    type Error = ValidationError;

    fn try_from(query: SubscriptionListQuery) -> Result<Self, Self::Error> {
        let user_id = non_empty(query.user_id)
            .map(|user_id| parse_id(&user_id, "user_id"))
            .transpose()?;
        let start_date = non_empty(query.start_date)
            .map(|start_date| MonthYear::parse(&start_date, "start_date"))
            .transpose()?;
        let end_date = non_empty(query.end_date)
            .map(|end_date| MonthYear::parse(&end_date, "end_date"))
            .transpose()?;
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = query.offset.unwrap_or(0);

        if limit < 0 {
            return Err(ValidationError::new("limit", "must not be negative"));
        }

        if offset < 0 {
            return Err(ValidationError::new("offset", "must not be negative"));
        }

        Ok(SubscriptionFilter {
            user_id,
            service_name: non_empty(query.service_name),
            start_date,
            end_date,
            limit,
            offset,
        })
    }
}
