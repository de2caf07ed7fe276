//! Ambient facts consumed by checks.
//!
//! The engine only defines the read contract ([`Context::get_fact`]). Facts
//! are gathered by a [`ContextProvider`] before a run starts, so evaluation
//! itself never blocks on I/O.
//!
//! - [`FactSnapshot`] - immutable in-memory context
//! - [`EnvContextProvider`] - gathers facts from the environment, `php -m`
//!   and cache backend probes

mod facts;
mod provider;

pub use facts::{FactSnapshot, FactSnapshotBuilder, FactValue};
pub use provider::{ContextProvider, EnvContextProvider, StaticProvider};

/// Well-known fact keys.
pub mod keys {
    /// Object cache backend: `db_transient`, `apcu`, `redis`, `memcached`, `object_cache`.
    pub const CACHE_BACKEND: &str = "cache_backend";
    /// Address the cache backend answered on.
    pub const CACHE_PROBE_ADDR: &str = "cache_probe_addr";
    /// Whether the OPcache functions are available.
    pub const OPCACHE_ENABLED: &str = "opcache_enabled";
    /// Whether the Intl extension is loaded.
    pub const INTL_LOADED: &str = "intl_loaded";
    /// Site locale, e.g. `en_US`.
    pub const LOCALE: &str = "locale";
    pub const PHP_VERSION: &str = "php_version";
    /// Loaded PHP modules (lowercase).
    pub const PHP_MODULES: &str = "php_modules";
}

/// Read-only bag of ambient facts.
pub trait Context: Send + Sync {
    /// Look up a fact by key.
    fn get_fact(&self, key: &str) -> Option<&FactValue>;

    /// Text fact, `None` if absent or not text.
    fn text(&self, key: &str) -> Option<&str> {
        self.get_fact(key).and_then(FactValue::as_text)
    }

    /// Boolean fact, `None` if absent or not boolean.
    fn flag(&self, key: &str) -> Option<bool> {
        self.get_fact(key).and_then(FactValue::as_bool)
    }
}
