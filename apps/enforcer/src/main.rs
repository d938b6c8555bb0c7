//! Warden enforcement relay.
//!
//! Polls the dashboard API for audit log entries the game server has not
//! applied yet, delivers each one to the game server webhook and marks it
//! handled once delivery succeeds.

#![forbid(unsafe_code)]

mod config;
mod relay;

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warden_core::AppError;

use crate::config::EnforcerConfig;
use crate::relay::{Relay, relay_batch};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = EnforcerConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        api_base_url = %config.api_base_url,
        webhook_url = %config.webhook_url,
        batch_limit = config.batch_limit,
        poll_interval_ms = config.poll_interval_ms,
        "warden-enforcer started"
    );

    let relay = Relay::new(http_client, config);
    let poll_interval = Duration::from_millis(relay.config().poll_interval_ms);

    loop {
        match relay_batch(&relay).await {
            // A full batch means more may be waiting.
            Ok(processed) if processed == relay.config().batch_limit => continue,
            Ok(_) => {}
            Err(error) => warn!(error = %error, "enforcement batch interrupted"),
        }

        tokio::time::sleep(poll_interval).await;
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
