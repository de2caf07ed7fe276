//! Plain-text and JSON renderers for reports.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use super::Report;
use crate::check::Severity;

/// JSON view: the report plus derived aggregates.
#[derive(Serialize)]
struct ReportView<'a> {
    #[serde(flatten)]
    report: &'a Report,
    worst: Option<Severity>,
    counts: BTreeMap<Severity, usize>,
}

/// Render as pretty JSON.
pub fn json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&view(report))
}

/// Render as a `serde_json::Value`.
pub fn json_value(report: &Report) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(view(report))
}

fn view(report: &Report) -> ReportView<'_> {
    ReportView {
        report,
        worst: report.worst(),
        counts: report.summary_counts(),
    }
}

/// Render as an aligned terminal table grouped by category.
///
/// ```text
/// performance
///   recommended  obj_cache  You should use object caching
///                           Your site uses database transient. ...
///
/// 1 check: 0 good, 1 recommended, 0 critical (worst: recommended)
/// ```
pub fn text(report: &Report) -> String {
    let mut out = String::new();

    let sev_width = Severity::ALL
        .iter()
        .map(|s| s.as_str().len())
        .max()
        .unwrap_or(0);
    let id_width = report
        .verdicts()
        .iter()
        .map(|v| v.check_id().as_str().len())
        .max()
        .unwrap_or(0);

    for section in report.sections() {
        let _ = writeln!(out, "{}", section.category);
        for v in &section.verdicts {
            let _ = writeln!(
                out,
                "  {:<sev_width$}  {:<id_width$}  {}",
                v.severity().as_str(),
                v.check_id().as_str(),
                v.title(),
            );
            let indent = 2 + sev_width + 2 + id_width + 2;
            if !v.detail().is_empty() {
                let _ = writeln!(out, "{:indent$}{}", "", v.detail());
            }
            for action in v.actions() {
                let _ = writeln!(out, "{:indent$}-> {}", "", action);
            }
        }
        out.push('\n');
    }

    if !report.not_applicable().is_empty() {
        let skipped: Vec<&str> = report.not_applicable().iter().map(|id| id.as_str()).collect();
        let _ = writeln!(out, "not applicable: {}", skipped.join(", "));
    }
    if !report.unknown_selections().is_empty() {
        let unknown: Vec<&str> = report
            .unknown_selections()
            .iter()
            .map(|id| id.as_str())
            .collect();
        let _ = writeln!(out, "unknown checks: {}", unknown.join(", "));
    }

    let counts = report.summary_counts();
    let per_severity: Vec<String> = counts
        .iter()
        .map(|(s, n)| format!("{} {}", n, s))
        .collect();
    let _ = writeln!(
        out,
        "{} check{}: {} (worst: {})",
        report.len(),
        if report.len() == 1 { "" } else { "s" },
        per_severity.join(", "),
        report.worst().map(|s| s.as_str()).unwrap_or("none"),
    );

    out
}
