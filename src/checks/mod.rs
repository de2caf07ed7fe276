//! Built-in checks.
//!
//! These are ordinary [`Check`](crate::check::Check) implementations; the
//! engine has no special knowledge of them.

mod i18n;
mod object_cache;
mod opcache;

pub use i18n::IntlCheck;
pub use object_cache::ObjectCacheCheck;
pub use opcache::OpcacheCheck;

use crate::error::DuplicateCheckError;
use crate::registry::Registry;

pub const PERFORMANCE: &str = "performance";
pub const INTERNATIONALIZATION: &str = "internationalization";

/// Register the object cache, OPcache and Intl checks, in that order.
pub fn register_defaults(
    registry: &mut Registry,
    default_locale: &str,
) -> Result<(), DuplicateCheckError> {
    registry.register(ObjectCacheCheck::new())?;
    registry.register(OpcacheCheck::new())?;
    registry.register(IntlCheck::new(default_locale))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults() {
        let mut registry = Registry::new();
        register_defaults(&mut registry, "en_US").unwrap();

        let ids: Vec<&str> = registry.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["obj_cache", "opcache", "i18n_check"]);

        // second time around every id collides
        let err = register_defaults(&mut registry, "en_US").unwrap_err();
        assert_eq!(err.id.as_str(), "obj_cache");
        assert_eq!(registry.len(), 3);
    }
}
