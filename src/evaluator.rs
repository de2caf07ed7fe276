//! Evaluator: runs checks and assembles a [`Report`].
//!
//! Failure isolation is the evaluator's core contract. A check that returns a
//! fault, panics, or tags its verdict with a foreign id never aborts the run.
//! It is turned into a `critical` verdict in the `internal` category instead,
//! so [`Evaluator::run`] always yields a report.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::check::{Check, CheckId, Severity, Verdict, INTERNAL_CATEGORY};
use crate::context::Context;
use crate::error::CheckEvaluationFault;
use crate::registry::Registry;
use crate::report::Report;

/// Optional set of check ids restricting a run.
pub type Selector = BTreeSet<CheckId>;

/// Evaluator configuration.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Worker threads used for one run (1 = sequential on the caller's thread).
    pub parallelism: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self { parallelism: 1 }
    }
}

/// Outcome of one check slot before assembly.
enum Outcome {
    Verdict(Verdict),
    /// Verdict synthesized from a fault.
    Fault(Verdict),
    NotApplicable,
}

/// Runs checks from a registry against a context.
///
/// Holds no state between runs; every run produces a new report.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create a sequential evaluator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of worker threads (0 is treated as 1).
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.config.parallelism = parallelism.max(1);
        self
    }

    /// Run all checks, or only those named by `selector`.
    ///
    /// Unknown selector entries are skipped and listed in the report.
    /// Verdicts appear in registration order regardless of parallelism.
    pub fn run(
        &self,
        registry: &Registry,
        ctx: &dyn Context,
        selector: Option<&Selector>,
    ) -> Report {
        let start = Instant::now();

        let unknown: Vec<CheckId> = selector
            .map(|ids| {
                ids.iter()
                    .filter(|id| !registry.contains(id.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        for id in &unknown {
            warn!(check_id = %id, "selected check is not registered, skipping");
        }

        let selected: Vec<&dyn Check> = registry
            .all()
            .filter(|c| selector.map_or(true, |ids| ids.contains(c.id())))
            .collect();

        let outcomes = if self.config.parallelism > 1 && selected.len() > 1 {
            self.evaluate_parallel(&selected, ctx)
        } else {
            selected.iter().map(|c| evaluate_one(*c, ctx)).collect()
        };

        let mut verdicts = Vec::with_capacity(outcomes.len());
        let mut not_applicable = Vec::new();
        let mut faulted = Vec::new();
        for (check, outcome) in selected.iter().zip(outcomes) {
            match outcome {
                Outcome::Verdict(v) => verdicts.push(v),
                Outcome::Fault(v) => {
                    faulted.push(check.id().clone());
                    verdicts.push(v);
                }
                Outcome::NotApplicable => not_applicable.push(check.id().clone()),
            }
        }

        let report = Report::new(verdicts, not_applicable, unknown).with_faulted(faulted);
        info!(
            run_id = %report.run_id(),
            checks = selected.len(),
            verdicts = report.len(),
            faults = report.faults().count(),
            worst = report.worst().map(|s| s.as_str()).unwrap_or("none"),
            duration_ms = start.elapsed().as_millis() as u64,
            "evaluation finished"
        );
        report
    }

    /// Evaluate on scoped threads in contiguous chunks, keeping slot order.
    fn evaluate_parallel(&self, checks: &[&dyn Check], ctx: &dyn Context) -> Vec<Outcome> {
        let workers = self.config.parallelism.min(checks.len());
        let chunk_size = checks.len().div_ceil(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = checks
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|c| evaluate_one(*c, ctx))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(checks.chunks(chunk_size))
                .flat_map(|(handle, chunk)| {
                    // evaluate_one catches panics, so a join error is unexpected
                    handle.join().unwrap_or_else(|_| {
                        chunk
                            .iter()
                            .map(|c| {
                                Outcome::Fault(fault_verdict(
                                    *c,
                                    &CheckEvaluationFault::Panicked("worker thread died".into()),
                                ))
                            })
                            .collect()
                    })
                })
                .collect()
        })
    }
}

/// Evaluate a single check with full fault isolation.
fn evaluate_one(check: &dyn Check, ctx: &dyn Context) -> Outcome {
    let start = Instant::now();

    let applicable = match panic::catch_unwind(AssertUnwindSafe(|| check.applicable(ctx))) {
        Ok(applicable) => applicable,
        Err(payload) => {
            let fault = CheckEvaluationFault::Panicked(panic_message(payload.as_ref()));
            return Outcome::Fault(record_fault(check, fault));
        }
    };

    if !applicable {
        debug!(target: "check", check_id = %check.id(), "check not applicable, skipped");
        return Outcome::NotApplicable;
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| check.evaluate(ctx)))
        .unwrap_or_else(|payload| {
            Err(CheckEvaluationFault::Panicked(panic_message(payload.as_ref())))
        })
        .and_then(|verdict| {
            if verdict.check_id() == check.id() {
                Ok(verdict)
            } else {
                Err(CheckEvaluationFault::MismatchedVerdict {
                    expected: check.id().clone(),
                    found: verdict.check_id().clone(),
                })
            }
        });

    match result {
        Ok(verdict) => {
            debug!(
                target: "check",
                check_id = %check.id(),
                severity = verdict.severity().as_str(),
                category = verdict.category(),
                duration_us = start.elapsed().as_micros() as u64,
                "check evaluated"
            );
            Outcome::Verdict(verdict)
        }
        Err(fault) => Outcome::Fault(record_fault(check, fault)),
    }
}

fn record_fault(check: &dyn Check, fault: CheckEvaluationFault) -> Verdict {
    warn!(
        target: "check",
        check_id = %check.id(),
        severity = Severity::Critical.as_str(),
        fault = fault.kind(),
        error = %fault,
        "check failed"
    );
    fault_verdict(check, &fault)
}

/// Synthesize the `critical`/`internal` verdict for a failed check.
fn fault_verdict(check: &dyn Check, fault: &CheckEvaluationFault) -> Verdict {
    Verdict::builder(check.id().clone(), Severity::Critical)
        .title(format!("{} could not be completed", check.label()))
        .detail(format!("Check '{}' failed: {}", check.id(), fault))
        .category(INTERNAL_CATEGORY)
        .build()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
