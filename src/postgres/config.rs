use tokio_postgres::Config as PgConfig;

use crate::error::TableMapError;

use super::connection::PostgresConnection;

/// Options for connecting to `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub config: PgConfig,
}

impl PostgresOptions {
    #[must_use]
    pub fn new(config: PgConfig) -> Self {
        Self { config }
    }

    /// Parse a libpq-style connection string or URL.
    ///
    /// # Errors
    /// Returns `TableMapError::ConfigError` when the string cannot be parsed.
    pub fn from_conninfo(conninfo: &str) -> Result<Self, TableMapError> {
        let config = conninfo
            .parse::<PgConfig>()
            .map_err(|e| TableMapError::ConfigError(format!("invalid postgres conninfo: {e}")))?;
        Ok(Self { config })
    }
}

/// Fluent builder for `PostgreSQL` options.
#[derive(Debug, Clone, Default)]
pub struct PostgresOptionsBuilder {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    dbname: Option<String>,
}

impl PostgresOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = Some(dbname.into());
        self
    }

    /// # Errors
    /// Returns `TableMapError::ConfigError` if host, user, or dbname is missing.
    pub fn finish(self) -> Result<PostgresOptions, TableMapError> {
        let host = self
            .host
            .ok_or_else(|| TableMapError::ConfigError("host is required".to_string()))?;
        let user = self
            .user
            .ok_or_else(|| TableMapError::ConfigError("user is required".to_string()))?;
        let dbname = self
            .dbname
            .ok_or_else(|| TableMapError::ConfigError("dbname is required".to_string()))?;

        let mut config = PgConfig::new();
        config.host(&host).user(&user).dbname(&dbname);
        if let Some(port) = self.port {
            config.port(port);
        }
        if let Some(password) = self.password {
            config.password(password);
        }
        Ok(PostgresOptions { config })
    }

    /// # Errors
    /// Returns `TableMapError` if the options are incomplete or the connection fails.
    pub fn connect(self) -> Result<PostgresConnection, TableMapError> {
        PostgresConnection::connect(&self.finish()?)
    }
}
