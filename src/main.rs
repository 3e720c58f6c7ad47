use subscription_service::config::get_configuration;
use subscription_service::startup::Application;
use subscription_service::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(String::from("subscription_service"), String::from("info"));

    init_subscriber(subscriber);

    let config = get_configuration().expect("Missing configuration file.");
    let address = config.get_address();
    let application = Application::build(config)
        .await
        .expect("Failed to build application.");

    tracing::info!("Server listening on {}", address);

    application.run_until_stop().await
}
