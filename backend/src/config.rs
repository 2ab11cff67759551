//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `LEDGER_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_APP_NAME: &str = "ledgerApp";

/// Invalid settings detected after loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr {
        /// Rejected value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// `database_url` was set to an empty string.
    #[error("database URL must not be empty")]
    EmptyDatabaseUrl,
}

/// Runtime configuration for the ledger server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEDGER")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// Prefix of the `X-{app}-alert` headers.
    pub app_name: Option<String>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Application name used in alert headers.
    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(DEFAULT_APP_NAME)
    }

    /// Pool settings when a database is configured.
    ///
    /// # Errors
    /// Returns [`SettingsError::EmptyDatabaseUrl`] for a blank URL.
    pub fn pool_config(&self) -> Result<Option<PoolConfig>, SettingsError> {
        let Some(url) = self.database_url.as_deref() else {
            return Ok(None);
        };
        if url.trim().is_empty() {
            return Err(SettingsError::EmptyDatabaseUrl);
        }

        let mut config = PoolConfig::new(url).with_min_idle(self.pool_min_idle);
        if let Some(max) = self.pool_max_size {
            config = config.with_max_size(max);
        }
        if let Some(secs) = self.pool_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Ok(Some(config))
    }
}
