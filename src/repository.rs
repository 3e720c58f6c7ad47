use chrono::Utc;
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::{
    cost_summary::CostSummaryPeriod,
    new_subscription::NewSubscription,
    subscription::Subscription,
    subscription_filter::{escape_like, SubscriptionFilter},
    subscription_update::{SubscriptionChange, SubscriptionUpdate},
};

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("No subscription matched the given id.")]
    NoRowMatched,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

/// Gateway over the `subscriptions` table. Every call checks a connection out of the
/// pool for a single statement.
#[derive(Clone)]
pub struct SubscriptionRepository {
    db_pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    #[tracing::instrument(
        name = "Insert a new subscription into the database",
        skip(self, new_subscription),
        fields(
            service_name = %new_subscription.service_name.as_ref(),
            user_id = %new_subscription.user_id
        )
    )]
    pub async fn insert(
        &self,
        new_subscription: &NewSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_subscription.service_name.as_ref())
        .bind(new_subscription.price.value())
        .bind(new_subscription.user_id)
        .bind(new_subscription.start_date.as_date())
        .bind(new_subscription.end_date.map(|end_date| end_date.as_date()))
        .bind(now)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })
    }

    #[tracing::instrument(name = "Fetch a subscription by id", skip(self))]
    pub async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })
    }

    /// Writes the supplied columns plus `updated_at` in one statement.
    #[tracing::instrument(
        name = "Apply a partial update to a subscription",
        skip(self, update),
        fields(columns = ?update.columns())
    )]
    pub async fn apply_update(
        &self,
        id: Uuid,
        update: &SubscriptionUpdate,
    ) -> Result<(), StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE subscriptions SET ");

        for change in update.changes() {
            // Column names come from the closed set of changes, never from the request
            query.push(change.column()).push(" = ");

            match change {
                SubscriptionChange::ServiceName(service_name) => {
                    query.push_bind(service_name.as_ref().to_string())
                }
                SubscriptionChange::Price(price) => query.push_bind(price.value()),
                SubscriptionChange::EndDate(end_date) => {
                    query.push_bind(end_date.map(|end_date| end_date.as_date()))
                }
            };

            query.push(", ");
        }

        query.push("updated_at = ").push_bind(Utc::now());
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.db_pool).await.map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NoRowMatched);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Delete a subscription", skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .map_err(|err| {
                tracing::error!("Failed to execute query: {:?}", err);
                err
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NoRowMatched);
        }

        Ok(())
    }

    #[tracing::instrument(name = "List subscriptions", skip(self))]
    pub async fn list(
        &self,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            FROM subscriptions
            WHERE TRUE
            "#,
        );

        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }

        if let Some(service_name) = &filter.service_name {
            query
                .push(" AND service_name ILIKE ")
                .push_bind(format!("%{}%", escape_like(service_name)));
        }

        if let Some(start_date) = filter.start_date {
            query.push(" AND start_date >= ").push_bind(start_date.as_date());
        }

        // Ongoing subscriptions have no end and always satisfy the upper bound
        if let Some(end_date) = filter.end_date {
            query
                .push(" AND (end_date IS NULL OR end_date <= ")
                .push_bind(end_date.as_date())
                .push(")");
        }

        query.push(" ORDER BY start_date DESC, created_at DESC");

        if filter.limit > 0 {
            query.push(" LIMIT ").push_bind(filter.limit);
        }

        if filter.offset > 0 {
            query.push(" OFFSET ").push_bind(filter.offset);
        }

        query
            .build()
            .try_map(|row: PgRow| Subscription::from_row(&row))
            .fetch_all(&self.db_pool)
            .await
            .map_err(|err| {
                tracing::error!("Failed to execute query: {:?}", err);
                err
            })
    }

    /// Sums the full price of every subscription whose active months overlap the period.
    #[tracing::instrument(name = "Sum subscription prices over a period", skip(self))]
    pub async fn total_price(&self, period: &CostSummaryPeriod) -> Result<i64, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT COALESCE(SUM(price), 0) AS total_price FROM subscriptions WHERE start_date <= ",
        );

        query.push_bind(period.end.as_date());
        query
            .push(" AND (end_date IS NULL OR end_date >= ")
            .push_bind(period.start.as_date())
            .push(")");

        if let Some(user_id) = period.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }

        if let Some(service_name) = &period.service_name {
            query
                .push(" AND service_name ILIKE ")
                .push_bind(escape_like(service_name));
        }

        let row = query
            .build()
            .fetch_one(&self.db_pool)
            .await
            .map_err(|err| {
                tracing::error!("Failed to execute query: {:?}", err);
                err
            })?;

        row.try_get::<i64, _>("total_price")
    }
}
