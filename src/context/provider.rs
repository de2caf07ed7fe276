//! Context providers.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{keys, FactSnapshot};
use crate::config::ProbeConfig;
use crate::error::ProviderError;

/// Gathers ambient facts once, before a run.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Provider name (used for logging).
    fn name(&self) -> &'static str;

    /// Gather a fresh snapshot.
    async fn gather(&self) -> Result<FactSnapshot, ProviderError>;
}

/// Provider that always returns the same snapshot.
pub struct StaticProvider {
    snapshot: FactSnapshot,
}

impl StaticProvider {
    pub fn new(snapshot: FactSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl ContextProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn gather(&self) -> Result<FactSnapshot, ProviderError> {
        Ok(self.snapshot.clone())
    }
}

/// Provider backed by environment overrides, PHP introspection and
/// cache backend probes.
///
/// Probe failures degrade to absent or negative facts. Only an unusable
/// configuration is an error.
pub struct EnvContextProvider {
    config: ProbeConfig,
}

impl EnvContextProvider {
    /// Create a provider, validating the probe configuration.
    pub fn new(config: ProbeConfig) -> Result<Self, ProviderError> {
        if config.php_binary.trim().is_empty() {
            return Err(ProviderError::Invalid {
                key: "PHP_BINARY".into(),
                message: "must not be empty".into(),
            });
        }
        if config.probe_timeout.is_zero() {
            return Err(ProviderError::Invalid {
                key: "PROBE_TIMEOUT".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(Self { config })
    }

    /// Run the PHP binary with `args`, returning stdout on success.
    async fn run_php(&self, args: &[&str]) -> Option<String> {
        let mut cmd = Command::new(&self.config.php_binary);
        cmd.args(args).kill_on_drop(true);

        match tokio::time::timeout(self.config.probe_timeout, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                debug!(binary = %self.config.php_binary, status = ?output.status, "php exited with failure");
                None
            }
            Ok(Err(e)) => {
                debug!(binary = %self.config.php_binary, error = %e, "php not available");
                None
            }
            Err(_) => {
                warn!(binary = %self.config.php_binary, "php introspection timed out");
                None
            }
        }
    }

    /// Resolve the cache backend from override, probes and modules.
    async fn resolve_cache_backend(&self, modules: Option<&[String]>) -> (String, Option<String>) {
        if let Some(ref backend) = self.config.cache_backend {
            return (backend.to_lowercase(), None);
        }

        let candidates = [
            ("redis", self.config.redis_addr.as_deref()),
            ("memcached", self.config.memcached_addr.as_deref()),
        ];
        for (backend, addr) in candidates {
            if let Some(addr) = addr {
                if probe_tcp(addr, self.config.probe_timeout).await {
                    return (backend.to_string(), Some(addr.to_string()));
                }
                warn!(backend, addr, "cache backend unreachable");
            }
        }

        let has_apcu = modules.is_some_and(|m| m.iter().any(|name| name == "apcu"));
        if has_apcu {
            ("apcu".to_string(), None)
        } else {
            ("db_transient".to_string(), None)
        }
    }

    fn resolve_locale(&self) -> String {
        self.config
            .site_locale
            .clone()
            .or_else(|| self.config.lang.as_deref().and_then(normalize_locale))
            .unwrap_or_else(|| self.config.default_locale.clone())
    }
}

#[async_trait]
impl ContextProvider for EnvContextProvider {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn gather(&self) -> Result<FactSnapshot, ProviderError> {
        let modules = self.run_php(&["-m"]).await.map(|out| parse_php_modules(&out));
        let version = self
            .run_php(&["-r", "echo PHP_VERSION;"])
            .await
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let has_module = |name: &str| {
            modules
                .as_ref()
                .map(|m| m.iter().any(|module| module == name))
        };

        let opcache = self.config.opcache_enabled.or_else(|| has_module("zend opcache"));
        let intl = self.config.intl_loaded.or_else(|| has_module("intl"));
        let (backend, probe_addr) = self.resolve_cache_backend(modules.as_deref()).await;
        let locale = self.resolve_locale();

        debug!(
            provider = self.name(),
            cache_backend = %backend,
            locale = %locale,
            php_detected = modules.is_some(),
            "facts gathered"
        );

        Ok(FactSnapshot::builder()
            .fact(keys::CACHE_BACKEND, backend)
            .fact_opt(keys::CACHE_PROBE_ADDR, probe_addr)
            .fact_opt(keys::OPCACHE_ENABLED, opcache)
            .fact_opt(keys::INTL_LOADED, intl)
            .fact(keys::LOCALE, locale)
            .fact_opt(keys::PHP_VERSION, version)
            .fact_opt(keys::PHP_MODULES, modules)
            .stamped()
            .build())
    }
}

/// Try a TCP connect within `timeout`.
async fn probe_tcp(addr: &str, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Parse `php -m` output into lowercase module names.
///
/// Section headers (`[PHP Modules]`, `[Zend Modules]`) and blank lines are skipped.
/// Each module is kept once, at its first position.
pub(crate) fn parse_php_modules(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut modules: Vec<String> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('['))
        .map(str::to_lowercase)
        .collect();
    modules.retain(|module| seen.insert(module.clone()));
    modules
}

/// Turn a `LANG` value into a locale: `de_DE.UTF-8` -> `de_DE`.
///
/// Returns `None` for `C`, `POSIX` and empty values.
pub(crate) fn normalize_locale(lang: &str) -> Option<String> {
    let base = lang
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    match base {
        "" | "C" | "POSIX" => None,
        other => Some(other.to_string()),
    }
}
