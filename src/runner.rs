//! Host-level run: gather context, evaluate under a deadline, record metrics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::context::{ContextProvider, FactSnapshot};
use crate::error::RunError;
use crate::evaluator::{Evaluator, Selector};
use crate::observability::ReportMetrics;
use crate::registry::Registry;
use crate::report::Report;

/// Drives one diagnostic run end to end.
///
/// Facts are gathered once per run, then the (synchronous) evaluator runs on
/// the blocking pool. The deadline covers both steps.
#[derive(Clone)]
pub struct Runner {
    registry: Arc<Registry>,
    provider: Arc<dyn ContextProvider>,
    evaluator: Evaluator,
    selector: Option<Arc<Selector>>,
    deadline: Option<Duration>,
    metrics: Option<Arc<ReportMetrics>>,
}

impl Runner {
    pub fn new(registry: Arc<Registry>, provider: Arc<dyn ContextProvider>) -> Self {
        Self {
            registry,
            provider,
            evaluator: Evaluator::new(),
            selector: None,
            deadline: None,
            metrics: None,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Restrict runs to the given check ids.
    pub fn with_selector(mut self, selector: Option<Selector>) -> Self {
        self.selector = selector.map(Arc::new);
        self
    }

    /// Discard runs that take longer than `deadline` (None disables).
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ReportMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn metrics(&self) -> Option<&Arc<ReportMetrics>> {
        self.metrics.as_ref()
    }

    /// Gather a fresh fact snapshot from the provider.
    pub async fn gather(&self) -> Result<FactSnapshot, RunError> {
        let snapshot = self.provider.gather().await.map_err(|e| {
            warn!(provider = self.provider.name(), error = %e, "context gathering failed");
            RunError::from(e)
        })?;
        debug!(
            provider = self.provider.name(),
            facts = snapshot.len(),
            "context gathered"
        );
        Ok(snapshot)
    }

    /// Run once and return the report.
    pub async fn run_once(&self) -> Result<Report, RunError> {
        let start = Instant::now();

        let report = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.gather_and_evaluate())
                .await
                .map_err(|_| {
                    warn!(deadline_ms = deadline.as_millis() as u64, "run exceeded deadline, discarding");
                    RunError::DeadlineExceeded(deadline)
                })??,
            None => self.gather_and_evaluate().await?,
        };

        if let Some(ref metrics) = self.metrics {
            metrics.observe(&report, start.elapsed());
        }
        Ok(report)
    }

    async fn gather_and_evaluate(&self) -> Result<Report, RunError> {
        let snapshot = self.gather().await?;

        let registry = Arc::clone(&self.registry);
        let evaluator = self.evaluator.clone();
        let selector = self.selector.clone();

        tokio::task::spawn_blocking(move || {
            evaluator.run(&registry, &snapshot, selector.as_deref())
        })
        .await
        .map_err(|e| RunError::Join(e.to_string()))
    }
}
