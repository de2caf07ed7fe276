//! Configuration module for sitehealth.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use sitehealth::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Fail on: {:?}", config.report.fail_on);
//! println!("Probe timeout: {:?}", config.probe.probe_timeout);
//! ```

mod error;
mod logging;
mod parse;
mod probe;
mod report;
mod server;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use parse::{parse_duration, parse_id_list};
pub use probe::ProbeConfig;
pub use report::{OutputFormat, ReportConfig};
pub use server::ServerConfig;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Selection, output format, exit policy.
    pub report: ReportConfig,
    /// Context probe configuration.
    pub probe: ProbeConfig,
    /// Internal server configuration.
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            logging: LoggingConfig::from_env()?,
            report: ReportConfig::from_env()?,
            probe: ProbeConfig::from_env()?,
            server: ServerConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Service: {}", self.logging.service_name);
        info!("  Report format: {:?}", self.report.format);

        match self.report.selector {
            Some(ref selector) => {
                let ids: Vec<&str> = selector.iter().map(|id| id.as_str()).collect();
                info!("  Checks: {}", ids.join(", "));
            }
            None => info!("  Checks: all"),
        }

        match self.report.fail_on {
            Some(threshold) => info!("  Fail on: {}", threshold),
            None => info!("  Fail on: off"),
        }

        info!("  Parallelism: {}", self.report.parallelism);

        if let Some(timeout) = self.report.run_timeout {
            info!("  Run timeout: {}ms", timeout.as_millis());
        } else {
            info!("  Run timeout: disabled");
        }

        info!("  Default locale: {}", self.probe.default_locale);
        info!("  Probe timeout: {}ms", self.probe.probe_timeout.as_millis());

        if let Some(ref backend) = self.probe.cache_backend {
            info!("  Cache backend override: {}", backend);
        }

        if let Some(ref internal) = self.server.internal_addr {
            info!("  Internal server: {}", internal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Severity;
    use std::time::Duration;

    #[test]
    fn test_config_defaults() {
        // Clear all env vars that might affect the test
        for key in [
            "LOG_FORMAT",
            "SERVICE_NAME",
            "REPORT_FORMAT",
            "CHECKS",
            "FAIL_ON",
            "CHECK_PARALLELISM",
            "RUN_TIMEOUT",
            "INTERNAL_ADDR",
            "DEFAULT_LOCALE",
            "PROBE_TIMEOUT",
            "PHP_BINARY",
            "CACHE_BACKEND",
            "OPCACHE_ENABLED",
        ] {
            std::env::remove_var(key);
        }

        let config = Config::from_env().expect("Should load config");

        assert_eq!(config.logging.service_name, "sitehealth");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.report.format, OutputFormat::Text);
        assert!(config.report.selector.is_none());
        assert_eq!(config.report.fail_on, Some(Severity::Critical));
        assert_eq!(config.report.parallelism, 1);
        assert_eq!(config.report.run_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.probe.default_locale, "en_US");
        assert_eq!(config.probe.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.probe.php_binary, "php");
        assert!(config.probe.cache_backend.is_none());
        assert!(config.probe.opcache_enabled.is_none());
        assert!(config.server.internal_addr.is_none());
    }
}
