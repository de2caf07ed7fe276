//! Internal server tests (/health, /info, /metrics)

use crate::helpers::*;
use reqwest::StatusCode;
use sitehealth::check::Severity;
use sitehealth::context::{keys, FactSnapshot};

/// Healthy site: /health is 200 with a JSON report
#[tokio::test]
async fn test_health_ok() {
    let server = TestServer::start(healthy_facts(), Some(Severity::Critical)).await;
    let resp = server.get("/health").await;

    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "application/json");

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["worst"], "good");
    assert_eq!(body["verdicts"].as_array().unwrap().len(), 2);
    assert_eq!(body["not_applicable"][0], "i18n_check");
    assert!(body["run_id"].is_string());
}

/// Worst severity at the threshold turns /health into 503
#[tokio::test]
async fn test_health_fails_threshold() {
    let facts = FactSnapshot::builder()
        .fact(keys::CACHE_BACKEND, "db_transient")
        .fact(keys::OPCACHE_ENABLED, true)
        .build();
    let server = TestServer::start(facts, Some(Severity::Recommended)).await;
    let resp = server.get("/health").await;

    assert_status(&resp, StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["worst"], "recommended");
}

/// Without a threshold the report is always served with 200
#[tokio::test]
async fn test_health_threshold_off() {
    // no cache backend fact: obj_cache faults to critical
    let server = TestServer::start(FactSnapshot::new(), None).await;
    let resp = server.get("/health").await;

    assert_status(&resp, StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["worst"], "critical");
    let fault = &body["verdicts"][0];
    assert_eq!(fault["check_id"], "obj_cache");
    assert_eq!(fault["category"], "internal");
}

/// /info lists the default panels with facts filled in
#[tokio::test]
async fn test_info_panels() {
    let server = TestServer::start(healthy_facts(), None).await;
    let resp = server.get("/info").await;

    assert_status(&resp, StatusCode::OK);
    let panels: serde_json::Value = resp.json().await.unwrap();
    let keys: Vec<&str> = panels
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["objectcache", "opcache", "i18n", "engine"]);
    assert_eq!(panels[0]["fields"][0]["value"], "redis");
    assert_eq!(panels[3]["label"], "sitehealth-test");
}

/// /metrics reflects runs served by /health
#[tokio::test]
async fn test_metrics_after_health() {
    let server = TestServer::start(healthy_facts(), None).await;
    server.get("/health").await;
    server.get("/health").await;

    let resp = server.get("/metrics").await;
    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/plain");

    let body = resp.text().await.unwrap();
    assert!(body.contains("sitehealth_runs_total 2"), "{}", body);
    assert!(body.contains(r#"sitehealth_verdicts{severity="good"} 2"#));
    assert!(body.contains("sitehealth_check_severity"));
}

/// Unknown paths return 404
#[tokio::test]
async fn test_unknown_path() {
    let server = TestServer::start(healthy_facts(), None).await;
    let resp = server.get("/config").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

/// Only GET and HEAD are served
#[tokio::test]
async fn test_post_not_allowed() {
    let server = TestServer::start(healthy_facts(), None).await;
    let resp = server.post("/health").await;
    assert_status(&resp, StatusCode::METHOD_NOT_ALLOWED);
}
