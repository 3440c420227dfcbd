//! Application configuration loaded via OrthoConfig.
//!
//! Values come from `USERS_*` environment variables, configuration files and
//! command-line flags, in OrthoConfig's usual precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_HEALTH_CHECK_SECS: u64 = 30;

/// Configuration problems detected after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No connection string was given and the in-memory store is off.
    #[error("USERS_DB_STRING must be set unless in-memory mode is enabled")]
    MissingDbString,
}

/// Settings for the users service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct AppConfig {
    /// Connection string for the user store.
    pub db_string: Option<String>,
    /// Port the HTTP listener binds to.
    #[ortho_config(default = 3000)]
    pub port: u16,
    /// Interface the HTTP listener binds to.
    pub host: Option<String>,
    /// Upper bound on pooled store connections.
    pub pool_max_size: Option<u32>,
    /// Seconds between store liveness pings.
    pub health_check_secs: Option<u64>,
    /// Serve from process memory instead of PostgreSQL.
    #[ortho_config(default = false)]
    pub in_memory: bool,
}

impl AppConfig {
    /// Return the bind host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Interval between store pings once connected.
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(
            self.health_check_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_HEALTH_CHECK_SECS),
        )
    }

    /// Pool settings for the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDbString`] when no connection string is
    /// configured.
    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let url = self
            .db_string
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDbString)?;
        Ok(PoolConfig::new(url)
            .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)))
    }
}
