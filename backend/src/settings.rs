//! Service configuration loaded via OrthoConfig.
//!
//! Layers, lowest precedence first: defaults, configuration file, `ROSTER_*`
//! environment variables, command-line flags.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE_PATH: &str = "./database.db";
const DEFAULT_POOL_MAX_SIZE: u32 = 8;

/// Settings rejected after loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("host `{host}` is not an IP address")]
    InvalidHost { host: String },
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
    #[error("database_path must not be empty")]
    EmptyDatabasePath,
}

/// Runtime configuration for the service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct RosterSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// SQLite database file; its parent directory is created on startup.
    pub database_path: Option<PathBuf>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
}

impl RosterSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn database_path(&self) -> &Path {
        self.database_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DATABASE_PATH))
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Resolve the listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP
    /// address literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip: IpAddr = self
            .host()
            .parse()
            .map_err(|_| SettingsError::InvalidHost {
                host: self.host().to_owned(),
            })?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.bind_addr()?;
        if self.pool_max_size() == 0 {
            return Err(SettingsError::EmptyPool);
        }
        if self.database_path().as_os_str().is_empty() {
            return Err(SettingsError::EmptyDatabasePath);
        }
        Ok(())
    }
}
