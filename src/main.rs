use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_admin::config::Config;
use campus_admin::configure_routes;
use campus_admin::middleware::{json_config, path_config, query_config, RequestId};
use campus_admin::permissions::{MySqlPermissionRepository, PermissionService};
use campus_admin::reports::{MySqlFeeItemRepository, MySqlPaymentRecordRepository, ReportService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    // JSON lines in production, human-readable output elsewhere
    let production = config.is_production();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("campus_admin={},actix_web=info", config.app.log_level).into()
            }),
        )
        .with(production.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!production).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!(env = %config.app.env, "Starting campus admin service");

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;
    tracing::info!(
        pool_size = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let permission_service = web::Data::new(PermissionService::new(Arc::new(
        MySqlPermissionRepository::new(db_pool.clone()),
    )));
    let report_service = web::Data::new(ReportService::new(
        Arc::new(MySqlFeeItemRepository::new(db_pool.clone())),
        Arc::new(MySqlPaymentRecordRepository::new(db_pool.clone())),
        config.app.report_currency,
    ));
    let pool_data = web::Data::new(db_pool);

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(pool_data.clone())
            .app_data(permission_service.clone())
            .app_data(report_service.clone())
            .configure(configure_routes)
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!(address = %bind_address, "Server started");
    server.await.context("Server terminated with an error")?;
    Ok(())
}
