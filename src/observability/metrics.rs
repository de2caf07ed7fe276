//! Prometheus metrics for sitehealth.

use std::time::Duration;

use prometheus::{
    Counter, Encoder, GaugeVec, Histogram, HistogramOpts, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

use crate::check::Severity;
use crate::report::Report;

/// Prometheus registry with per-run and per-check metrics.
///
/// Run counters accumulate; the per-check gauges describe the latest report
/// only and are reset on every observation.
pub struct ReportMetrics {
    registry: Registry,

    /// Completed runs
    pub runs_total: Counter,

    /// Verdicts synthesized from check faults
    pub check_faults_total: Counter,

    /// Verdict count per severity in the latest report
    pub verdicts: IntGaugeVec,

    /// Severity rank (0 good, 1 recommended, 2 critical) per check
    pub check_severity: GaugeVec,

    /// Duration of gather + evaluate
    pub run_duration_seconds: Histogram,
}

impl ReportMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let run_buckets = vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

        let runs_total = Counter::new("sitehealth_runs_total", "Total diagnostic runs")?;
        registry.register(Box::new(runs_total.clone()))?;

        let check_faults_total = Counter::new(
            "sitehealth_check_faults_total",
            "Checks that failed to produce a verdict",
        )?;
        registry.register(Box::new(check_faults_total.clone()))?;

        let verdicts = IntGaugeVec::new(
            Opts::new("sitehealth_verdicts", "Verdicts per severity in the latest report"),
            &["severity"],
        )?;
        registry.register(Box::new(verdicts.clone()))?;

        let check_severity = GaugeVec::new(
            Opts::new(
                "sitehealth_check_severity",
                "Severity rank per check in the latest report",
            ),
            &["check_id", "category"],
        )?;
        registry.register(Box::new(check_severity.clone()))?;

        let run_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "sitehealth_run_duration_seconds",
                "Diagnostic run duration in seconds",
            )
            .buckets(run_buckets),
        )?;
        registry.register(Box::new(run_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            runs_total,
            check_faults_total,
            verdicts,
            check_severity,
            run_duration_seconds,
        })
    }

    /// Record a finished report.
    pub fn observe(&self, report: &Report, elapsed: Duration) {
        self.runs_total.inc();
        self.check_faults_total.inc_by(report.faults().count() as f64);
        self.run_duration_seconds.observe(elapsed.as_secs_f64());

        for (severity, count) in report.summary_counts() {
            self.verdicts
                .with_label_values(&[severity.as_str()])
                .set(count as i64);
        }

        self.check_severity.reset();
        for verdict in report.verdicts() {
            self.check_severity
                .with_label_values(&[verdict.check_id().as_str(), verdict.category()])
                .set(f64::from(verdict.severity().rank()));
        }
    }

    /// Current value of the verdict gauge for `severity`.
    pub fn verdict_count(&self, severity: Severity) -> i64 {
        self.verdicts.with_label_values(&[severity.as_str()]).get()
    }

    /// Export all metrics in Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Get the underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
