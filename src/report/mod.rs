//! Report: the immutable result of one evaluation run.
//!
//! All query methods borrow the report; nothing mutates it after the
//! evaluator hands it out.

pub mod render;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::check::{CheckId, Severity, Verdict};

/// Ordered verdicts of one run plus run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    verdicts: Vec<Verdict>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    not_applicable: Vec<CheckId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unknown_selections: Vec<CheckId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    faulted: Vec<CheckId>,
}

impl Report {
    pub(crate) fn new(
        verdicts: Vec<Verdict>,
        not_applicable: Vec<CheckId>,
        unknown_selections: Vec<CheckId>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            verdicts,
            not_applicable,
            unknown_selections,
            faulted: Vec::new(),
        }
    }

    /// Record the checks whose verdicts were synthesized from faults.
    pub(crate) fn with_faulted(mut self, faulted: Vec<CheckId>) -> Self {
        self.faulted = faulted;
        self
    }

    /// Unique id of the run that produced this report.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Verdicts in evaluation order.
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    /// Verdicts with severity `s`, in evaluation order.
    pub fn by_severity(&self, s: Severity) -> Vec<&Verdict> {
        self.verdicts.iter().filter(|v| v.severity() == s).collect()
    }

    /// Verdicts in category `c`, in evaluation order.
    pub fn by_category(&self, c: &str) -> Vec<&Verdict> {
        self.verdicts.iter().filter(|v| v.category() == c).collect()
    }

    /// Verdict for a given check, if it produced one.
    pub fn get(&self, id: &str) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| v.check_id().as_str() == id)
    }

    /// Highest severity present, `None` for an empty report.
    pub fn worst(&self) -> Option<Severity> {
        self.verdicts.iter().map(Verdict::severity).max()
    }

    /// Count per severity. Every severity is present, possibly with 0.
    pub fn summary_counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|&s| (s, 0)).collect();
        for v in &self.verdicts {
            *counts.entry(v.severity()).or_insert(0) += 1;
        }
        counts
    }

    /// Whether the worst severity is at or above `threshold`.
    pub fn fails(&self, threshold: Severity) -> bool {
        self.worst().is_some_and(|w| w >= threshold)
    }

    /// Verdicts synthesized from check faults.
    ///
    /// Only checks the evaluator recorded as faulted count; a regular
    /// verdict in the `internal` category is not a fault.
    pub fn faults(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts
            .iter()
            .filter(|v| self.faulted.contains(v.check_id()))
    }

    /// Ids of checks that faulted, in evaluation order.
    pub fn faulted(&self) -> &[CheckId] {
        &self.faulted
    }

    /// Group verdicts by category, in order of first appearance.
    pub fn sections(&self) -> Vec<ReportSection<'_>> {
        let mut sections: Vec<ReportSection<'_>> = Vec::new();
        for v in &self.verdicts {
            match sections.iter_mut().find(|s| s.category == v.category()) {
                Some(section) => section.verdicts.push(v),
                None => sections.push(ReportSection {
                    category: v.category(),
                    verdicts: vec![v],
                }),
            }
        }
        sections
    }

    /// Checks skipped because they were not applicable.
    pub fn not_applicable(&self) -> &[CheckId] {
        &self.not_applicable
    }

    /// Selector entries that named no registered check.
    pub fn unknown_selections(&self) -> &[CheckId] {
        &self.unknown_selections
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

/// Verdicts sharing one category.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection<'a> {
    pub category: &'a str,
    pub verdicts: Vec<&'a Verdict>,
}

impl ReportSection<'_> {
    /// Highest severity in this section.
    pub fn worst(&self) -> Option<Severity> {
        self.verdicts.iter().map(|v| v.severity()).max()
    }
}
