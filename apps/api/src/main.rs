//! Warden moderation dashboard API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;
#[cfg(test)]
mod test_support;

use std::env;

use tracing::info;
use warden_core::{AppError, StaffRole};

use crate::api_config::{ApiCommand, ApiConfig, init_tracing, required_env};
use crate::api_router::build_router;
use crate::api_services::{
    build_app_state, build_postgres_session_layer, build_staff_service, connect_and_migrate,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    match ApiCommand::parse(env::args().skip(1))? {
        ApiCommand::Serve => serve().await,
        ApiCommand::Migrate => {
            connect_and_migrate(&required_env("DATABASE_URL")?).await?;
            Ok(())
        }
        ApiCommand::AddStaff { username, role } => add_staff(&username, role).await,
    }
}

async fn serve() -> Result<(), AppError> {
    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(&config.database_url).await?;

    let session_layer = build_postgres_session_layer(
        pool.clone(),
        config.cookie_secure,
        config.session_ttl_minutes,
    )
    .await?;

    let app_state = build_app_state(pool, &config);
    let app = build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, frontend_url = %config.frontend_url, "warden api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server failed: {error}")))
}

async fn add_staff(username: &str, role: StaffRole) -> Result<(), AppError> {
    let password = required_env("WARDEN_STAFF_PASSWORD")?;
    let pool = connect_and_migrate(&required_env("DATABASE_URL")?).await?;

    let identity = build_staff_service(&pool)
        .create_account(username, &password, role)
        .await?;

    info!(username = %identity.username(), role = %identity.role(), "staff account ready");
    Ok(())
}
