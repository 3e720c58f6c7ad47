use serde::{Deserialize, Deserializer};

use crate::domain::month_year::MonthYear;
use crate::domain::price::Price;
use crate::domain::service_name::ServiceName;
use crate::domain::validation_error::ValidationError;

/// What the client asked for the end date: a missing key leaves it alone,
/// `""` or `null` clears it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum EndDatePatch {
    #[default]
    Unchanged,
    Clear,
    Set(String),
}

impl<'de> Deserialize<'de> for EndDatePatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;

        Ok(match value {
            None => EndDatePatch::Clear,
            Some(end_date) if end_date.trim().is_empty() => EndDatePatch::Clear,
            Some(end_date) => EndDatePatch::Set(end_date),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubscriptionBody {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    #[serde(default)]
    pub end_date: EndDatePatch,
}

/// A single column assignment. The set of writable columns is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    ServiceName(ServiceName),
    Price(Price),
    EndDate(Option<MonthYear>),
}

impl SubscriptionChange {
    pub fn column(&self) -> &'static str {
        match self {
            SubscriptionChange::ServiceName(_) => "service_name",
            SubscriptionChange::Price(_) => "price",
            SubscriptionChange::EndDate(_) => "end_date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionUpdate(Vec<SubscriptionChange>);

impl SubscriptionUpdate {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn changes(&self) -> &[SubscriptionChange] {
        &self.0
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.0.iter().map(SubscriptionChange::column).collect()
    }
}

impl TryFrom<UpdateSubscriptionBody> for SubscriptionUpdate {
    type Error = ValidationError;

    fn try_from(body: UpdateSubscriptionBody) -> Result<Self, Self::Error> {
        let mut changes = Vec::with_capacity(3);

        if let Some(service_name) = body.service_name {
            changes.push(SubscriptionChange::ServiceName(ServiceName::parse(
                service_name,
            )?));
        }

        if let Some(price) = body.price {
            changes.push(SubscriptionChange::Price(Price::parse(price)?));
        }

        match body.end_date {
            EndDatePatch::Unchanged => {}
            EndDatePatch::Clear => changes.push(SubscriptionChange::EndDate(None)),
            EndDatePatch::Set(end_date) => changes.push(SubscriptionChange::EndDate(Some(
                MonthYear::parse(&end_date, "end_date")?,
            ))),
        }

        Ok(SubscriptionUpdate(changes))
    }
}
