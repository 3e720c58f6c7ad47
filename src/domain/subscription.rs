use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use crate::domain::month_year::MonthYear;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Subscription {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Subscription {
            id: row.try_get("id")?,
            service_name: row.try_get("service_name")?,
            price: row.try_get("price")?,
            user_id: row.try_get("user_id")?,
            start_date: row.try_get::<NaiveDate, _>("start_date")?.into(),
            end_date: row
                .try_get::<Option<NaiveDate>, _>("end_date")?
                .map(MonthYear::from),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
