//! Built-in panels.

use super::{InfoField, InfoProvider, InfoSection};
use crate::context::{keys, Context};
use crate::registry::Registry;

/// Panel that renders a fixed list of facts.
///
/// Missing facts are shown as "unknown" rather than omitted, so the panel
/// shape is stable across deployments.
pub struct FactsPanel {
    key: String,
    label: String,
    description: Option<String>,
    fields: Vec<(String, &'static str)>,
}

impl FactsPanel {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Show fact `key` under `label`.
    pub fn field(mut self, label: impl Into<String>, key: &'static str) -> Self {
        self.fields.push((label.into(), key));
        self
    }

    /// Object cache panel.
    pub fn object_cache() -> Self {
        Self::new("objectcache", "Object cache")
            .field("Backend", keys::CACHE_BACKEND)
            .field("Probed address", keys::CACHE_PROBE_ADDR)
    }

    /// OPcache panel.
    pub fn opcache() -> Self {
        Self::new("opcache", "OPcache")
            .description("OPcache settings and status")
            .field("Enabled", keys::OPCACHE_ENABLED)
            .field("PHP version", keys::PHP_VERSION)
    }

    /// Locale and Intl panel.
    pub fn i18n() -> Self {
        Self::new("i18n", "Internationalization")
            .field("Locale", keys::LOCALE)
            .field("Intl extension", keys::INTL_LOADED)
    }
}

impl InfoProvider for FactsPanel {
    fn key(&self) -> &str {
        &self.key
    }

    fn section(&self, ctx: &dyn Context) -> InfoSection {
        let fields = self
            .fields
            .iter()
            .map(|(label, key)| {
                let value = ctx
                    .get_fact(key)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                InfoField::new(label.clone(), value)
            })
            .collect();

        InfoSection {
            key: self.key.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            fields,
        }
    }
}

/// Diagnostic panel describing the engine itself.
pub struct EnginePanel {
    service: String,
    checks: Vec<String>,
}

impl EnginePanel {
    /// Snapshot the registered check ids; the registry is append-only
    /// after startup so the list does not go stale.
    pub fn new(service: impl Into<String>, registry: &Registry) -> Self {
        Self {
            service: service.into(),
            checks: registry.ids().map(|id| id.to_string()).collect(),
        }
    }
}

impl InfoProvider for EnginePanel {
    fn key(&self) -> &str {
        "engine"
    }

    fn section(&self, _ctx: &dyn Context) -> InfoSection {
        InfoSection {
            key: "engine".into(),
            label: self.service.clone(),
            description: Some("Diagnostic engine information".into()),
            fields: vec![
                InfoField::new("Version", crate::VERSION),
                InfoField::new("Check count", self.checks.len().to_string()),
                InfoField::new("Registered checks", self.checks.join(", ")),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks;
    use crate::context::FactSnapshot;

    #[test]
    fn test_facts_panel_renders_unknown() {
        let ctx = FactSnapshot::builder()
            .fact(keys::CACHE_BACKEND, "redis")
            .build();
        let section = FactsPanel::object_cache().section(&ctx);

        assert_eq!(section.key, "objectcache");
        assert_eq!(section.fields[0], InfoField::new("Backend", "redis"));
        assert_eq!(section.fields[1], InfoField::new("Probed address", "unknown"));
        assert!(section.description.is_none());
    }

    #[test]
    fn test_opcache_panel_formats_bool() {
        let ctx = FactSnapshot::builder()
            .fact(keys::OPCACHE_ENABLED, true)
            .fact(keys::PHP_VERSION, "8.4.1")
            .build();
        let section = FactsPanel::opcache().section(&ctx);
        assert_eq!(section.fields[0].value, "yes");
        assert_eq!(section.fields[1].value, "8.4.1");
        assert_eq!(section.description.as_deref(), Some("OPcache settings and status"));
    }

    #[test]
    fn test_engine_panel_lists_checks() {
        let mut registry = Registry::new();
        checks::register_defaults(&mut registry, "en_US").unwrap();

        let panel = EnginePanel::new("sitehealth", &registry);
        let section = panel.section(&FactSnapshot::new());
        assert_eq!(section.label, "sitehealth");
        assert_eq!(section.fields[1].value, "3");
        assert_eq!(section.fields[2].value, "obj_cache, opcache, i18n_check");
    }
}
