//! Append-only check registry.
//!
//! Built once at startup, then shared read-only (typically behind an `Arc`)
//! for the lifetime of the process. There is no removal operation.

use std::collections::HashMap;

use crate::check::{Check, CheckId};
use crate::error::{DuplicateCheckError, UnknownCheckId};

/// Mapping from [`CheckId`] to [`Check`], iterated in registration order.
#[derive(Default)]
pub struct Registry {
    checks: Vec<Box<dyn Check>>,
    index: HashMap<CheckId, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check, taking ownership of it.
    ///
    /// Fails if a check with the same id is already present; the original
    /// registration is left untouched.
    pub fn register<C: Check + 'static>(&mut self, check: C) -> Result<(), DuplicateCheckError> {
        self.register_boxed(Box::new(check))
    }

    /// Register an already boxed check.
    pub fn register_boxed(&mut self, check: Box<dyn Check>) -> Result<(), DuplicateCheckError> {
        let id = check.id().clone();
        if self.index.contains_key(&id) {
            return Err(DuplicateCheckError { id });
        }

        tracing::debug!(check_id = %id, category = check.category(), "check registered");
        self.index.insert(id, self.checks.len());
        self.checks.push(check);
        Ok(())
    }

    /// Look up a check by id.
    pub fn get(&self, id: &str) -> Option<&dyn Check> {
        self.index.get(id).map(|&i| self.checks[i].as_ref())
    }

    /// Look up a check by id, failing with [`UnknownCheckId`].
    pub fn lookup(&self, id: &str) -> Result<&dyn Check, UnknownCheckId> {
        self.get(id).ok_or_else(|| UnknownCheckId {
            id: CheckId::from(id),
        })
    }

    /// All checks in registration order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &dyn Check> + '_ {
        self.checks.iter().map(|c| c.as_ref())
    }

    /// All ids in registration order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &CheckId> + '_ {
        self.checks.iter().map(|c| c.id())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Severity, Verdict};
    use crate::context::Context;
    use crate::error::CheckEvaluationFault;

    struct Named {
        id: CheckId,
        category: &'static str,
    }

    impl Named {
        fn new(id: &str, category: &'static str) -> Self {
            Self {
                id: CheckId::from(id),
                category,
            }
        }
    }

    impl Check for Named {
        fn id(&self) -> &CheckId {
            &self.id
        }

        fn category(&self) -> &str {
            self.category
        }

        fn evaluate(&self, _ctx: &dyn Context) -> Result<Verdict, CheckEvaluationFault> {
            Ok(Verdict::builder(self.id.clone(), Severity::Good)
                .category(self.category)
                .build())
        }
    }

    #[test]
    fn test_registration_order() {
        let mut registry = Registry::new();
        for id in ["zeta", "alpha", "mu", "beta"] {
            registry.register(Named::new(id, "performance")).unwrap();
        }

        let ids: Vec<&str> = registry.all().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mu", "beta"]);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.all().len(), 4);
    }

    #[test]
    fn test_duplicate_keeps_original() {
        let mut registry = Registry::new();
        registry.register(Named::new("opcache", "performance")).unwrap();

        let err = registry
            .register(Named::new("opcache", "other"))
            .unwrap_err();
        assert_eq!(err.id.as_str(), "opcache");

        assert_eq!(registry.len(), 1);
        let original = registry.get("opcache").unwrap();
        assert_eq!(original.category(), "performance");
    }

    #[test]
    fn test_get_and_lookup() {
        let mut registry = Registry::new();
        registry.register(Named::new("obj_cache", "performance")).unwrap();

        assert!(registry.contains("obj_cache"));
        assert!(registry.get("missing").is_none());

        let err = registry.lookup("missing").err().unwrap();
        assert_eq!(err.id.as_str(), "missing");
        assert_eq!(registry.lookup("obj_cache").unwrap().id().as_str(), "obj_cache");
    }

    #[test]
    fn test_iteration_does_not_mutate() {
        let mut registry = Registry::new();
        registry.register(Named::new("a", "x")).unwrap();
        registry.register(Named::new("b", "x")).unwrap();

        let first: Vec<_> = registry.ids().cloned().collect();
        let second: Vec<_> = registry.ids().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(format!("{:?}", registry), "[CheckId(\"a\"), CheckId(\"b\")]");
    }
}
