use serde::Deserialize;
use uuid::Uuid;

use crate::domain::identifier::parse_id;
use crate::domain::month_year::MonthYear;
use crate::domain::price::Price;
use crate::domain::service_name::ServiceName;
use crate::domain::validation_error::ValidationError;

#[derive(Debug)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: Price,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

#[derive(Debug, Deserialize)]
pub struct NewSubscriptionBody {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

impl TryFrom<NewSubscriptionBody> for NewSubscription {
    type Error = ValidationError;

    fn try_from(body: NewSubscriptionBody) -> Result<Self, Self::Error> {
        let service_name = ServiceName::parse(body.service_name)?;
        let price = Price::parse(body.price)?;
        let user_id = parse_id(&body.user_id, "user_id")?;
        let start_date = MonthYear::parse(&body.start_date, "start_date")?;
        let end_date = match body.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(end_date) => Some(MonthYear::parse(end_date, "end_date")?),
        };

        if let Some(end_date) = end_date {
            if end_date < start_date {
                return Err(ValidationError::new(
                    "date_range",
                    "end_date must not be before start_date",
                ));
            }
        }

        Ok(NewSubscription {
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        })
    }
}
