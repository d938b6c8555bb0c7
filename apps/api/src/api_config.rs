use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use url::Url;
use warden_core::{AppError, StaffRole};

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 15;

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    /// Run the HTTP server.
    Serve,
    /// Apply migrations and exit.
    Migrate,
    /// Create a staff account. The password comes from `WARDEN_STAFF_PASSWORD`.
    AddStaff { username: String, role: StaffRole },
}

impl ApiCommand {
    /// Parses command line arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        match args.next().as_deref() {
            None | Some("serve") => Ok(Self::Serve),
            Some("migrate") => Ok(Self::Migrate),
            Some("add-staff") => {
                let (Some(username), Some(role), None) = (args.next(), args.next(), args.next())
                else {
                    return Err(AppError::Validation(
                        "usage: add-staff <username> <role 1..3>".to_owned(),
                    ));
                };

                let level = role.parse::<u8>().map_err(|error| {
                    AppError::Validation(format!("invalid staff role '{role}': {error}"))
                })?;

                Ok(Self::AddStaff {
                    username,
                    role: StaffRole::from_level(level)?,
                })
            }
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected serve, migrate or add-staff"
            ))),
        }
    }
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub session_ttl_minutes: i64,
    pub enforcer_shared_secret: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = required(&lookup, "DATABASE_URL")?;

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned());
        let parsed = Url::parse(&frontend_url).map_err(|error| {
            AppError::Validation(format!("invalid FRONTEND_URL '{frontend_url}': {error}"))
        })?;
        // Origin headers never carry a trailing slash.
        let frontend_url = parsed.origin().ascii_serialization();

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value.parse::<u16>().map_err(|error| {
                AppError::Validation(format!("invalid API_PORT '{value}': {error}"))
            })?,
            None => 3001,
        };

        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        let session_ttl_minutes = match lookup("SESSION_TTL_MINUTES") {
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "SESSION_TTL_MINUTES must be a positive number of minutes, got '{value}'"
                    ))
                })?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        let enforcer_shared_secret = required(&lookup, "ENFORCER_SHARED_SECRET")?;

        Ok(Self {
            database_url,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            session_ttl_minutes,
            enforcer_shared_secret,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;

        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Reads a required, non-blank environment variable.
pub fn required_env(name: &str) -> Result<String, AppError> {
    required(&|name: &str| env::var(name).ok(), name)
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
