use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};

use crate::{
    domain::{
        cost_summary::CostSummaryQuery, new_subscription::NewSubscriptionBody,
        subscription_filter::SubscriptionListQuery, subscription_update::UpdateSubscriptionBody,
    },
    service::{SubscriptionError, SubscriptionService},
};

#[tracing::instrument(
    name = "Creating a new subscription handler",
    skip(body, service),
    fields(
        service_name = %body.service_name,
        user_id = %body.user_id
    )
)]
pub async fn handle_create_subscription(
    body: web::Json<NewSubscriptionBody>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    let subscription = service.create(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(name = "Get a subscription handler", skip(service))]
pub async fn handle_get_subscription(
    path: web::Path<String>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    match service.get(&path.into_inner()).await? {
        Some(subscription) => Ok(HttpResponse::Ok().json(subscription)),
        None => Err(SubscriptionError::NotFound),
    }
}

#[tracing::instrument(name = "Update a subscription handler", skip(body, service))]
pub async fn handle_update_subscription(
    path: web::Path<String>,
    body: web::Json<UpdateSubscriptionBody>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    let id = service.update(&path.into_inner(), body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Subscription updated successfully",
        "id": id,
    })))
}

#[tracing::instrument(name = "Delete a subscription handler", skip(service))]
pub async fn handle_delete_subscription(
    path: web::Path<String>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    let id = service.delete(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Subscription deleted successfully",
        "id": id,
    })))
}

#[tracing::instrument(name = "List subscriptions handler", skip(query, service))]
pub async fn handle_list_subscriptions(
    query: web::Query<SubscriptionListQuery>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    let (filter, subscriptions) = service.list(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total": subscriptions.len(),
        "data": subscriptions,
        "limit": filter.limit,
        "offset": filter.offset,
    })))
}

#[tracing::instrument(name = "Aggregate subscription costs handler", skip(query, service))]
pub async fn handle_aggregate_subscriptions(
    query: web::Query<CostSummaryQuery>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscriptionError> {
    let summary = service.aggregate(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(summary))
}

impl ResponseError for SubscriptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::Validation(_) | SubscriptionError::NoUpdates => {
                StatusCode::BAD_REQUEST
            }
            SubscriptionError::NotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let SubscriptionError::Storage { .. } = self {
            tracing::error!("{:?}", self);
        }

        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
