use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use warden_core::AppError;
use warden_infrastructure::MIGRATOR;

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to connect to database: {error}"))
        })?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!("database migrations applied");
    Ok(pool)
}
