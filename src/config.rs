//! Service configuration, read once from the environment at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `DB_USER` | `postgres` |
//! | `DB_HOST` | `localhost` |
//! | `DB_NAME` | `tododb` |
//! | `DB_PASSWORD` | `postgres` |
//! | `DB_PORT` | `5432` |
//! | `PORT` | `8080` |
//! | `APP_ENV` | unset; `test` means the listener is never bound |
//! | `LOG_FORMAT` | `pretty`; `json` for structured output |

use std::{env, fmt};

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },
}

/// Output format for log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to [`LogFormat::Pretty`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub db_user: String,
    pub db_host: String,
    pub db_name: String,
    pub db_password: String,
    pub db_port: u16,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Set when `APP_ENV=test`: the router is built but never served.
    pub test_mode: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_user: "postgres".to_string(),
            db_host: "localhost".to_string(),
            db_name: "tododb".to_string(),
            db_password: "postgres".to_string(),
            db_port: 5432,
            port: 8080,
            test_mode: false,
            log_format: LogFormat::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_user", &self.db_user)
            .field("db_host", &self.db_host)
            .field("db_name", &self.db_name)
            .field("db_password", &"********")
            .field("db_port", &self.db_port)
            .field("port", &self.port)
            .field("test_mode", &self.test_mode)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Missing variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            db_user: lookup("DB_USER").unwrap_or(defaults.db_user),
            db_host: lookup("DB_HOST").unwrap_or(defaults.db_host),
            db_name: lookup("DB_NAME").unwrap_or(defaults.db_name),
            db_password: lookup("DB_PASSWORD").unwrap_or(defaults.db_password),
            db_port: parse_port("DB_PORT", lookup("DB_PORT"), defaults.db_port)?,
            port: parse_port("PORT", lookup("PORT"), defaults.port)?,
            test_mode: lookup("APP_ENV").is_some_and(|value| value.eq_ignore_ascii_case("test")),
            log_format: lookup("LOG_FORMAT")
                .map(|value| LogFormat::parse(&value))
                .unwrap_or_default(),
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }
}

fn parse_port(name: &'static str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort { name, value }),
    }
}
