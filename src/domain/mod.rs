pub mod cost_summary;
pub mod identifier;
pub mod month_year;
pub mod new_subscription;
pub mod price;
pub mod service_name;
pub mod subscription;
pub mod subscription_filter;
pub mod subscription_update;
pub mod validation_error;
