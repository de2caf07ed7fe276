//! Observability for diagnostic runs.
//!
//! Prometheus metrics summarising each report. Structured logging lives in
//! [`crate::logging`].
//!
//! ```rust,ignore
//! use sitehealth::observability::ReportMetrics;
//!
//! let metrics = ReportMetrics::new()?;
//! metrics.observe(&report, elapsed);
//! println!("{}", metrics.export()?);
//! ```

pub mod metrics;

pub use metrics::ReportMetrics;
