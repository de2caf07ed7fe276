//! Test helpers and utilities

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tokio::net::TcpListener;

use sitehealth::check::Severity;
use sitehealth::checks;
use sitehealth::context::{keys, FactSnapshot, StaticProvider};
use sitehealth::info::{self, InfoRegistry};
use sitehealth::observability::ReportMetrics;
use sitehealth::registry::Registry;
use sitehealth::runner::Runner;
use sitehealth::server::{serve, InternalState};

/// Registry with the built-in checks and `en_US` as default locale.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    checks::register_defaults(&mut registry, "en_US").expect("defaults register once");
    registry
}

/// Snapshot of a well configured site.
pub fn healthy_facts() -> FactSnapshot {
    FactSnapshot::builder()
        .fact(keys::CACHE_BACKEND, "redis")
        .fact(keys::OPCACHE_ENABLED, true)
        .fact(keys::LOCALE, "en_US")
        .fact(keys::PHP_VERSION, "8.4.1")
        .build()
}

/// Internal server running in the test's runtime.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a server over `facts` with the given failure threshold.
    pub async fn start(facts: FactSnapshot, fail_on: Option<Severity>) -> Self {
        let registry = default_registry();
        let mut info_registry = InfoRegistry::new();
        info::register_defaults(&mut info_registry, "sitehealth-test", &registry);

        let metrics = Arc::new(ReportMetrics::new().expect("metrics registry"));
        let runner = Runner::new(Arc::new(registry), Arc::new(StaticProvider::new(facts)))
            .with_deadline(Some(Duration::from_secs(5)))
            .with_metrics(metrics);
        let state = Arc::new(InternalState::new(runner, info_registry, fail_on));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr: SocketAddr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = serve(listener, state).await;
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{}", addr),
            client,
        }
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a POST request with an empty body
    pub async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("POST request failed")
    }
}

/// Assert response status
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert that header starts with prefix
pub fn assert_header_starts_with(response: &Response, name: &str, prefix: &str) {
    let value = response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Header '{}' not found", name))
        .to_str()
        .unwrap();
    assert!(
        value.starts_with(prefix),
        "Header '{}' should start with '{}', got '{}'",
        name,
        prefix,
        value
    );
}
