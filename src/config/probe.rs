//! Context probe configuration.

use std::time::Duration;

use super::parse::{env_bool_opt, env_duration, env_opt, env_or};
use super::ConfigError;

/// Where and how ambient facts are gathered.
#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// Locale for which the i18n check does not apply (DEFAULT_LOCALE).
    pub default_locale: String,
    /// Explicit site locale (SITE_LOCALE).
    pub site_locale: Option<String>,
    /// Process locale (LANG), used when SITE_LOCALE is unset.
    pub lang: Option<String>,
    /// Forced object cache backend (CACHE_BACKEND).
    pub cache_backend: Option<String>,
    /// Redis endpoint to probe (REDIS_ADDR).
    pub redis_addr: Option<String>,
    /// Memcached endpoint to probe (MEMCACHED_ADDR).
    pub memcached_addr: Option<String>,
    /// Bound for each TCP probe and PHP invocation (PROBE_TIMEOUT).
    pub probe_timeout: Duration,
    /// PHP binary used for introspection (PHP_BINARY).
    pub php_binary: String,
    /// Override for OPcache detection (OPCACHE_ENABLED).
    pub opcache_enabled: Option<bool>,
    /// Override for Intl detection (INTL_LOADED).
    pub intl_loaded: Option<bool>,
}

impl ProbeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let probe_timeout = env_duration("PROBE_TIMEOUT", "2s")?.ok_or_else(|| {
            ConfigError::Invalid {
                key: "PROBE_TIMEOUT".into(),
                message: "probe timeout cannot be disabled".into(),
            }
        })?;

        Ok(Self {
            default_locale: env_or("DEFAULT_LOCALE", "en_US"),
            site_locale: env_opt("SITE_LOCALE"),
            lang: env_opt("LANG"),
            cache_backend: env_opt("CACHE_BACKEND"),
            redis_addr: env_opt("REDIS_ADDR"),
            memcached_addr: env_opt("MEMCACHED_ADDR"),
            probe_timeout,
            php_binary: env_or("PHP_BINARY", "php"),
            opcache_enabled: env_bool_opt("OPCACHE_ENABLED"),
            intl_loaded: env_bool_opt("INTL_LOADED"),
        })
    }
}
