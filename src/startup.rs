use actix_web::dev::Server;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::repository::SubscriptionRepository;
use crate::routes::{
    handle_aggregate_subscriptions, handle_create_subscription, handle_delete_subscription,
    handle_get_subscription, handle_list_subscriptions, handle_update_subscription, health_check,
};
use crate::service::SubscriptionService;

#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("Failed to bind the server: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, StartupError> {
        let db_pool = get_connection_db_pool(&config.database);

        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Database migrations applied");

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, db_pool, config.get_shutdown_timeout())?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    /// Resolves once the server has stopped (SIGINT/SIGTERM trigger a graceful shutdown).
    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    shutdown_timeout: u64,
) -> Result<Server, std::io::Error> {
    let service = web::Data::new(SubscriptionService::new(SubscriptionRepository::new(
        db_pool,
    )));

    let server = HttpServer::new(move || {
        App::new()
            // Every request gets its own span with a request id
            .wrap(TracingLogger::default())
            // `/api/v1/subscriptions/` resolves to the same routes as without the slash
            .wrap(NormalizePath::trim())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api/v1/subscriptions")
                    .route("", web::post().to(handle_create_subscription))
                    .route("", web::get().to(handle_list_subscriptions))
                    // Registered before `/{id}` so it is not captured as an id
                    .route("/aggregate", web::get().to(handle_aggregate_subscriptions))
                    .route("/{id}", web::get().to(handle_get_subscription))
                    .route("/{id}", web::put().to(handle_update_subscription))
                    .route("/{id}", web::delete().to(handle_delete_subscription)),
            )
            .app_data(service.clone())
    })
    .shutdown_timeout(shutdown_timeout)
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .max_connections(config.get_max_connections())
        .acquire_timeout(config.get_acquire_timeout())
        .connect_lazy_with(config.get_db_options())
}
