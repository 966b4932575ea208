//! Typed server configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Everything the process needs from the environment is read once at
//! startup into [`ServerConfig`]; the rest of the code never touches
//! `std::env`. Parsing is separated from the env lookup so the validation
//! rules are testable without mutating process state.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is required")]
    MissingDatabaseUrl,
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
    #[error("invalid DB_MAX_CONNECTIONS: {0:?}")]
    InvalidDbMaxConnections(String),
}

/// Runtime configuration for the API server.
///
/// - `DATABASE_URL`: Postgres connection string (required)
/// - `PORT`: listen port, default 3000
/// - `DB_MAX_CONNECTIONS`: pool size, default 5
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Read and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `DATABASE_URL` is absent or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("PORT").ok(),
            std::env::var("DB_MAX_CONNECTIONS").ok(),
        )
    }

    fn from_values(
        database_url: Option<String>,
        port: Option<String>,
        db_max_connections: Option<String>,
    ) -> Result<Self, ConfigError> {
        let database_url = match database_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(ConfigError::MissingDatabaseUrl),
        };
        let port = match port {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
        };
        let db_max_connections = match db_max_connections {
            None => DEFAULT_DB_MAX_CONNECTIONS,
            Some(raw) => match raw.parse() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidDbMaxConnections(raw)),
            },
        };
        Ok(Self { database_url, port, db_max_connections })
    }
}
