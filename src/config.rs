//! Environment configuration.

use std::env;
use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid listen address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub nats_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000, database_url: None, database_max_connections: 10, nats_url: None }
    }
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Ok(Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: parse_or(non_empty("PORT"), "PORT", defaults.port)?,
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: parse_or(
                non_empty("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            nats_url: non_empty("NATS_URL"),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidNumber { name, value: v }),
        None => Ok(default),
    }
}
