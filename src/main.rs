mod common;
mod config;
mod routes;
#[cfg(test)]
mod test_helpers;

mod crops;
mod dashboard;
mod fields;
mod operations;

use crate::config::Config;
use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing/logging
    tracing_subscriber::fmt::init();

    // Load configuration and environment variables to pass to the application
    let config: Config = Config::from_env();
    let db_url = config
        .db_url
        .clone()
        .context("No database URL configured")?;

    let db: DatabaseConnection = Database::connect(&db_url)
        .await
        .context("Failed to connect to the database")?;

    if db.ping().await.is_ok() {
        tracing::info!("Connected to the database");
    } else {
        tracing::warn!("Could not ping the database");
    }

    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("DB migrations complete");

    tracing::info!(
        "Starting server {} ({} deployment) ...",
        config.app_name,
        config.deployment.to_uppercase()
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);

    let router = routes::build_router(&db, &config);
    axum::serve(listener, router.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
