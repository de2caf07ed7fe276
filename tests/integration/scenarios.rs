//! End-to-end scenarios through the public engine API.

use crate::helpers::*;
use sitehealth::check::{BadgeColor, CheckId, Severity};
use sitehealth::checks::{IntlCheck, ObjectCacheCheck, OpcacheCheck};
use sitehealth::context::{keys, FactSnapshot};
use sitehealth::evaluator::{Evaluator, Selector};
use sitehealth::registry::Registry;
use sitehealth::report::render;

fn object_cache_only() -> Registry {
    let mut registry = Registry::new();
    registry.register(ObjectCacheCheck::new()).unwrap();
    registry
}

#[test]
fn test_database_transients_recommend_object_cache() {
    let ctx = FactSnapshot::builder()
        .fact(keys::CACHE_BACKEND, "db_transient")
        .build();
    let report = Evaluator::new().run(&object_cache_only(), &ctx, None);

    assert_eq!(report.len(), 1);
    let verdict = &report.verdicts()[0];
    assert_eq!(verdict.check_id().as_str(), "obj_cache");
    assert_eq!(verdict.severity(), Severity::Recommended);
    assert_eq!(verdict.category(), "performance");
    assert_eq!(verdict.badge_color(), BadgeColor::Orange);
}

#[test]
fn test_redis_is_good() {
    let ctx = FactSnapshot::builder()
        .fact(keys::CACHE_BACKEND, "redis")
        .build();
    let report = Evaluator::new().run(&object_cache_only(), &ctx, None);

    assert_eq!(report.len(), 1);
    assert_eq!(report.verdicts()[0].severity(), Severity::Good);
    assert_eq!(report.worst(), Some(Severity::Good));
}

#[test]
fn test_default_locale_skips_intl() {
    let mut registry = Registry::new();
    registry.register(IntlCheck::new("en_US")).unwrap();
    let ctx = FactSnapshot::builder().fact(keys::LOCALE, "en_US").build();

    let report = Evaluator::new().run(&registry, &ctx, None);
    assert!(report.is_empty());
    assert_eq!(report.worst(), None);
    assert_eq!(report.not_applicable(), &[CheckId::from("i18n_check")]);
}

#[test]
fn test_selector_restricts_run() {
    let mut registry = Registry::new();
    registry.register(ObjectCacheCheck::new()).unwrap();
    registry.register(OpcacheCheck::new()).unwrap();

    let ctx = FactSnapshot::builder()
        .fact(keys::CACHE_BACKEND, "redis")
        .fact(keys::OPCACHE_ENABLED, false)
        .build();
    let selector: Selector = [CheckId::from("obj_cache")].into_iter().collect();

    let report = Evaluator::new().run(&registry, &ctx, Some(&selector));
    let ids: Vec<&str> = report
        .verdicts()
        .iter()
        .map(|v| v.check_id().as_str())
        .collect();
    assert_eq!(ids, vec!["obj_cache"]);
}

#[test]
fn test_full_default_run_is_idempotent() {
    let registry = default_registry();
    let ctx = FactSnapshot::builder()
        .fact(keys::CACHE_BACKEND, "apcu")
        .fact(keys::OPCACHE_ENABLED, false)
        .fact(keys::LOCALE, "de_DE")
        .fact(keys::INTL_LOADED, true)
        .build();

    let evaluator = Evaluator::new().with_parallelism(3);
    let first = evaluator.run(&registry, &ctx, None);
    let second = evaluator.run(&registry, &ctx, None);

    assert_eq!(first.len(), 3);
    assert_ne!(first.run_id(), second.run_id());
    for (a, b) in first.verdicts().iter().zip(second.verdicts()) {
        assert!(a.same_outcome(b), "{:?} != {:?}", a, b);
    }

    let apcu = first.get("obj_cache").unwrap();
    assert_eq!(apcu.severity(), Severity::Recommended);
    assert_eq!(apcu.badge_color(), BadgeColor::Blue);
    assert_eq!(first.get("i18n_check").unwrap().severity(), Severity::Good);
    assert_eq!(first.worst(), Some(Severity::Recommended));
    assert!(first.fails(Severity::Recommended));
    assert!(!first.fails(Severity::Critical));
}

#[test]
fn test_text_and_json_exports() {
    let registry = default_registry();
    let report = Evaluator::new().run(&registry, &healthy_facts(), None);

    let text = render::text(&report);
    assert!(text.contains("performance"));
    assert!(text.contains("not applicable: i18n_check"));
    assert!(text.trim_end().ends_with("(worst: good)"));

    let json: serde_json::Value = serde_json::from_str(&render::json(&report).unwrap()).unwrap();
    assert_eq!(json["counts"]["good"], 2);
    assert_eq!(json["counts"]["critical"], 0);
}
