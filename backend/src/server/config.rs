//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) app_name: String,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Listen on `bind_addr`, prefixing alert headers with `app_name`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, app_name: impl Into<String>) -> Self {
        Self {
            bind_addr,
            app_name: app_name.into(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, both record resources are served by the Diesel stores;
    /// otherwise the server keeps records in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Application name used in alert headers.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Whether records persist to PostgreSQL.
    #[must_use]
    pub fn has_db_pool(&self) -> bool {
        self.db_pool.is_some()
    }
}
