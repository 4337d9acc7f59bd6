use hearth_core::{AppError, Config};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connect to the platform database.
pub async fn create_pool(config: &Config) -> Result<PgPool, AppError> {
    if config.database_url.is_empty() {
        return Err(AppError::Config("DATABASE_URL not configured".to_string()));
    }

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    Ok(pool)
}
