use std::env;

use url::Url;
use warden_core::{AppError, AppResult};

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3001";
const DEFAULT_BATCH_LIMIT: usize = 25;
// The pending endpoint never returns more than this per call.
const MAX_BATCH_LIMIT: usize = 100;
const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct EnforcerConfig {
    pub api_base_url: String,
    pub shared_secret: String,
    pub webhook_url: Url,
    pub batch_limit: usize,
    pub poll_interval_ms: u64,
}

impl EnforcerConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let api_base_url = lookup("WARDEN_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Url::parse(&api_base_url).map_err(|error| {
            AppError::Validation(format!("invalid WARDEN_API_BASE_URL '{api_base_url}': {error}"))
        })?;

        let shared_secret = lookup("ENFORCER_SHARED_SECRET")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("ENFORCER_SHARED_SECRET is required".to_owned()))?;

        let webhook_url = lookup("GAME_SERVER_WEBHOOK_URL")
            .ok_or_else(|| AppError::Validation("GAME_SERVER_WEBHOOK_URL is required".to_owned()))
            .and_then(|value| {
                Url::parse(&value).map_err(|error| {
                    AppError::Validation(format!(
                        "invalid GAME_SERVER_WEBHOOK_URL '{value}': {error}"
                    ))
                })
            })?;

        let batch_limit = parse_positive(&lookup, "ENFORCER_BATCH_LIMIT", DEFAULT_BATCH_LIMIT)?
            .min(MAX_BATCH_LIMIT);
        let poll_interval_ms =
            parse_positive(&lookup, "ENFORCER_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;

        Ok(Self {
            api_base_url,
            shared_secret,
            webhook_url,
            batch_limit,
            poll_interval_ms,
        })
    }
}

fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> AppResult<T>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };

    let parsed = value.parse::<T>().map_err(|error| {
        AppError::Validation(format!("invalid {name} value '{value}': {error}"))
    })?;

    if parsed <= T::default() {
        return Err(AppError::Validation(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use warden_core::{AppError, AppResult};

    use super::EnforcerConfig;

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<EnforcerConfig> {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        EnforcerConfig::from_lookup(|name| vars.get(name).map(|value| (*value).to_owned()))
    }

    #[test]
    fn defaults_fill_optional_settings() -> AppResult<()> {
        let config = config_from(&[
            ("ENFORCER_SHARED_SECRET", "enforcer-secret"),
            ("GAME_SERVER_WEBHOOK_URL", "https://game.example/hooks/moderation"),
        ])?;

        assert_eq!(config.api_base_url, "http://127.0.0.1:3001");
        assert_eq!(config.batch_limit, 25);
        assert_eq!(config.poll_interval_ms, 5_000);
        assert_eq!(config.webhook_url.host_str(), Some("game.example"));
        Ok(())
    }

    #[test]
    fn trailing_slash_is_trimmed_from_api_base_url() -> AppResult<()> {
        let config = config_from(&[
            ("WARDEN_API_BASE_URL", "https://warden.example/"),
            ("ENFORCER_SHARED_SECRET", "enforcer-secret"),
            ("GAME_SERVER_WEBHOOK_URL", "https://game.example/hook"),
        ])?;

        assert_eq!(config.api_base_url, "https://warden.example");
        Ok(())
    }

    #[test]
    fn batch_limit_is_capped_at_the_server_maximum() -> AppResult<()> {
        let config = config_from(&[
            ("ENFORCER_SHARED_SECRET", "enforcer-secret"),
            ("GAME_SERVER_WEBHOOK_URL", "https://game.example/hook"),
            ("ENFORCER_BATCH_LIMIT", "500"),
        ])?;

        assert_eq!(config.batch_limit, 100);
        Ok(())
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let cases: [&[(&str, &str)]; 4] = [
            &[("GAME_SERVER_WEBHOOK_URL", "https://game.example/hook")],
            &[
                ("ENFORCER_SHARED_SECRET", "enforcer-secret"),
                ("GAME_SERVER_WEBHOOK_URL", "game server"),
            ],
            &[
                ("ENFORCER_SHARED_SECRET", "enforcer-secret"),
                ("GAME_SERVER_WEBHOOK_URL", "https://game.example/hook"),
                ("ENFORCER_BATCH_LIMIT", "0"),
            ],
            &[
                ("ENFORCER_SHARED_SECRET", "enforcer-secret"),
                ("GAME_SERVER_WEBHOOK_URL", "https://game.example/hook"),
                ("ENFORCER_POLL_INTERVAL_MS", "soon"),
            ],
        ];

        for pairs in cases {
            assert!(matches!(config_from(pairs), Err(AppError::Validation(_))));
        }
    }
}
