//! Internal server configuration.

use std::net::SocketAddr;

use super::parse::env_opt;
use super::ConfigError;

/// Internal server configuration loaded from environment.
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Internal server address for /health, /info and /metrics.
    /// When unset the binary runs once and exits.
    pub internal_addr: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let internal_addr = env_opt("INTERNAL_ADDR")
            .map(|s| {
                s.parse::<SocketAddr>().map_err(|e| ConfigError::Parse {
                    key: "INTERNAL_ADDR".into(),
                    value: s,
                    error: format!("{}", e),
                })
            })
            .transpose()?;

        Ok(Self { internal_addr })
    }
}
