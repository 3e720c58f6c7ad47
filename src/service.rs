use uuid::Uuid;

use crate::domain::{
    cost_summary::{CostSummary, CostSummaryPeriod, CostSummaryQuery},
    identifier::parse_id,
    new_subscription::{NewSubscription, NewSubscriptionBody},
    subscription::Subscription,
    subscription_filter::{SubscriptionFilter, SubscriptionListQuery},
    subscription_update::{SubscriptionUpdate, UpdateSubscriptionBody},
    validation_error::ValidationError,
};
use crate::repository::{StoreError, SubscriptionRepository};

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Subscription not found.")]
    NotFound,
    #[error("No fields to update.")]
    NoUpdates,
    #[error("Failed to {operation} subscription.")]
    Storage {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl SubscriptionError {
    fn storage(operation: &'static str) -> impl FnOnce(sqlx::Error) -> SubscriptionError {
        move |source| SubscriptionError::Storage { operation, source }
    }

    fn from_store(operation: &'static str) -> impl FnOnce(StoreError) -> SubscriptionError {
        move |err| match err {
            StoreError::NoRowMatched => SubscriptionError::NotFound,
            StoreError::Database(source) => SubscriptionError::Storage { operation, source },
        }
    }
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)?;

        if let SubscriptionError::Storage { source, .. } = self {
            write!(f, "\n\t({})", source)?;
        }

        Ok(())
    }
}

/// Use cases over subscriptions. Holds no state besides the repository, so it is safe to
/// share between workers.
#[derive(Clone)]
pub struct SubscriptionService {
    repository: SubscriptionRepository,
}

impl SubscriptionService {
    pub fn new(repository: SubscriptionRepository) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "Create a subscription", skip(self, body))]
    pub async fn create(
        &self,
        body: NewSubscriptionBody,
    ) -> Result<Subscription, SubscriptionError> {
        let new_subscription = NewSubscription::try_from(body)?;

        self.repository
            .insert(&new_subscription)
            .await
            .map_err(SubscriptionError::storage("create"))
    }

    /// A well formed id with no matching row is `Ok(None)`, not an error.
    #[tracing::instrument(name = "Get a subscription", skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Subscription>, SubscriptionError> {
        let id = parse_id(id, "id")?;

        self.repository
            .fetch_by_id(id)
            .await
            .map_err(SubscriptionError::storage("get"))
    }

    #[tracing::instrument(name = "Update a subscription", skip(self, body))]
    pub async fn update(
        &self,
        id: &str,
        body: UpdateSubscriptionBody,
    ) -> Result<Uuid, SubscriptionError> {
        let id = parse_id(id, "id")?;
        let update = SubscriptionUpdate::try_from(body)?;

        if update.is_empty() {
            return Err(SubscriptionError::NoUpdates);
        }

        self.repository
            .apply_update(id, &update)
            .await
            .map_err(SubscriptionError::from_store("update"))?;

        tracing::info!(%id, columns = ?update.columns(), "Subscription updated");

        Ok(id)
    }

    #[tracing::instrument(name = "Delete a subscription", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Uuid, SubscriptionError> {
        let id = parse_id(id, "id")?;

        self.repository
            .delete(id)
            .await
            .map_err(SubscriptionError::from_store("delete"))?;

        Ok(id)
    }

    #[tracing::instrument(name = "List subscriptions", skip(self, query))]
    pub async fn list(
        &self,
        query: SubscriptionListQuery,
    ) -> Result<(SubscriptionFilter, Vec<Subscription>), SubscriptionError> {
        let filter = SubscriptionFilter::try_from(query)?;
        let subscriptions = self
            .repository
            .list(&filter)
            .await
            .map_err(SubscriptionError::storage("list"))?;

        Ok((filter, subscriptions))
    }

    #[tracing::instrument(name = "Summarise subscription costs", skip(self, query))]
    pub async fn aggregate(
        &self,
        query: CostSummaryQuery,
    ) -> Result<CostSummary, SubscriptionError> {
        let period = CostSummaryPeriod::try_from(query)?;
        let total_price = self
            .repository
            .total_price(&period)
            .await
            .map_err(SubscriptionError::storage("aggregate"))?;

        Ok(CostSummary { total_price })
    }
}
