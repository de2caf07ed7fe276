//! Debug-information panels.
//!
//! Panels are informational: unlike checks they carry no severity, only a
//! label, an optional description and a list of fields. Registration is
//! first-wins so several components can offer the same panel without
//! clobbering each other.

mod panels;

pub use panels::{EnginePanel, FactsPanel};

use serde::Serialize;

use crate::context::Context;
use crate::registry::Registry;

/// One labelled value in a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

impl InfoField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A rendered panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoSection {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<InfoField>,
}

/// Produces a panel from ambient facts.
pub trait InfoProvider: Send + Sync {
    /// Unique panel key.
    fn key(&self) -> &str;

    /// Build the panel for `ctx`.
    fn section(&self, ctx: &dyn Context) -> InfoSection;
}

/// Ordered, first-wins collection of panel providers.
#[derive(Default)]
pub struct InfoRegistry {
    providers: Vec<Box<dyn InfoProvider>>,
}

impl InfoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider. Returns `false` (and keeps the existing one) when
    /// the key is already taken.
    pub fn add<P: InfoProvider + 'static>(&mut self, provider: P) -> bool {
        if self.providers.iter().any(|p| p.key() == provider.key()) {
            tracing::debug!(key = provider.key(), "info panel already present, keeping first");
            return false;
        }
        self.providers.push(Box::new(provider));
        true
    }

    /// Render every panel in registration order.
    pub fn collect(&self, ctx: &dyn Context) -> Vec<InfoSection> {
        self.providers.iter().map(|p| p.section(ctx)).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Add the object cache, OPcache, i18n and engine panels.
pub fn register_defaults(info: &mut InfoRegistry, service: &str, registry: &Registry) {
    info.add(FactsPanel::object_cache());
    info.add(FactsPanel::opcache());
    info.add(FactsPanel::i18n());
    info.add(EnginePanel::new(service, registry));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FactSnapshot;

    struct Fixed(&'static str, &'static str);

    impl InfoProvider for Fixed {
        fn key(&self) -> &str {
            self.0
        }

        fn section(&self, _ctx: &dyn Context) -> InfoSection {
            InfoSection {
                key: self.0.into(),
                label: self.1.into(),
                description: None,
                fields: vec![],
            }
        }
    }

    #[test]
    fn test_first_wins() {
        let mut registry = InfoRegistry::new();
        assert!(registry.add(Fixed("objectcache", "Object cache")));
        assert!(registry.add(Fixed("opcache", "OPcache")));
        assert!(!registry.add(Fixed("objectcache", "Impostor")));

        let sections = registry.collect(&FactSnapshot::new());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label, "Object cache");
        assert_eq!(sections[1].key, "opcache");
    }

    #[test]
    fn test_defaults() {
        let mut info = InfoRegistry::new();
        register_defaults(&mut info, "sitehealth", &Registry::new());
        let keys: Vec<_> = info
            .collect(&FactSnapshot::new())
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["objectcache", "opcache", "i18n", "engine"]);
    }
}
