//! Object cache check.

use crate::check::{BadgeColor, Check, CheckId, Severity, Verdict};
use crate::context::{keys, Context};
use crate::error::CheckEvaluationFault;

const SUGGESTION: &str = "You should consider using a dedicated object caching mechanism, \
                          like Memcached or Redis, to improve your site's speed.";

/// Reports which object cache backend the site uses.
///
/// | `cache_backend` | severity | badge |
/// |---|---|---|
/// | `db_transient`, `none` | recommended | orange |
/// | `apcu` | recommended | blue |
/// | `redis`, `memcached`, `object_cache` | good | blue |
///
/// Any other value (or no value) is a fault.
pub struct ObjectCacheCheck {
    id: CheckId,
}

impl ObjectCacheCheck {
    pub const ID: &'static str = "obj_cache";

    pub fn new() -> Self {
        Self {
            id: CheckId::from_static(Self::ID),
        }
    }
}

impl Default for ObjectCacheCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for ObjectCacheCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn label(&self) -> &str {
        "Object Cache Test"
    }

    fn category(&self) -> &str {
        super::PERFORMANCE
    }

    fn evaluate(&self, ctx: &dyn Context) -> Result<Verdict, CheckEvaluationFault> {
        let backend = ctx
            .text(keys::CACHE_BACKEND)
            .ok_or_else(|| CheckEvaluationFault::MissingFact {
                key: keys::CACHE_BACKEND.into(),
            })?;

        let verdict = match backend {
            "db_transient" | "none" => Verdict::builder(self.id.clone(), Severity::Recommended)
                .title("You should use object caching")
                .detail(format!("Your site uses database transient. {}", SUGGESTION))
                .badge(BadgeColor::Orange),
            "apcu" => Verdict::builder(self.id.clone(), Severity::Recommended)
                .title("You should improve object caching")
                .detail(format!(
                    "Your site uses APCu, but only a few plugins know how to take advantage of it. {}",
                    SUGGESTION
                ))
                .badge(BadgeColor::Blue),
            "redis" | "memcached" | "object_cache" => {
                Verdict::builder(self.id.clone(), Severity::Good)
                    .title("Your site uses object caching")
                    .detail("Your site uses a dedicated object caching mechanism. That's great.")
            }
            other => {
                return Err(CheckEvaluationFault::UnexpectedFact {
                    key: keys::CACHE_BACKEND.into(),
                    value: other.to_string(),
                })
            }
        };

        Ok(verdict.category(self.category()).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FactSnapshot;

    fn evaluate(backend: Option<&str>) -> Result<Verdict, CheckEvaluationFault> {
        let ctx = FactSnapshot::builder()
            .fact_opt(keys::CACHE_BACKEND, backend)
            .build();
        ObjectCacheCheck::new().evaluate(&ctx)
    }

    #[test]
    fn test_transient_is_recommended() {
        let v = evaluate(Some("db_transient")).unwrap();
        assert_eq!(v.severity(), Severity::Recommended);
        assert_eq!(v.category(), "performance");
        assert_eq!(v.badge_color(), BadgeColor::Orange);
        assert!(v.detail().contains("database transient"));
    }

    #[test]
    fn test_apcu_is_recommended_with_blue_badge() {
        let v = evaluate(Some("apcu")).unwrap();
        assert_eq!(v.severity(), Severity::Recommended);
        assert_eq!(v.badge_color(), BadgeColor::Blue);
    }

    #[test]
    fn test_dedicated_backends_are_good() {
        for backend in ["redis", "memcached", "object_cache"] {
            let v = evaluate(Some(backend)).unwrap();
            assert_eq!(v.severity(), Severity::Good, "{}", backend);
            assert_eq!(v.check_id().as_str(), ObjectCacheCheck::ID);
        }
    }

    #[test]
    fn test_unmatched_backend_is_a_fault() {
        assert_eq!(
            evaluate(Some("floppy")).unwrap_err(),
            CheckEvaluationFault::UnexpectedFact {
                key: "cache_backend".into(),
                value: "floppy".into(),
            }
        );
        assert!(matches!(
            evaluate(None).unwrap_err(),
            CheckEvaluationFault::MissingFact { .. }
        ));
    }
}
