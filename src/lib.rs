//! sitehealth - site-health diagnostics engine.
//!
//! Independent checks inspect an immutable snapshot of environment facts
//! and each produce a [`Verdict`](check::Verdict) with an ordered
//! [`Severity`](check::Severity). The [`Evaluator`](evaluator::Evaluator)
//! runs every registered check (or a selected subset), isolates checks that
//! fail, and assembles a [`Report`](report::Report).
//!
//! # Architecture
//!
//! ```text
//! ContextProvider ──gather──▶ FactSnapshot (Context)
//!                                   │
//!   Registry ──checks──▶ Evaluator ─┴─▶ Report ──▶ text / JSON / metrics / HTTP
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sitehealth::{checks, context::FactSnapshot, evaluator::Evaluator, registry::Registry};
//!
//! let mut registry = Registry::new();
//! checks::register_defaults(&mut registry, "en_US")?;
//!
//! let ctx = FactSnapshot::builder().fact("cache_backend", "redis").build();
//! let report = Evaluator::new().run(&registry, &ctx, None);
//! println!("{}", sitehealth::report::render::text(&report));
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 (abc12345-dirty)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod check;
pub mod checks;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod info;
pub mod logging;
pub mod observability;
pub mod registry;
pub mod report;
pub mod runner;
pub mod server;

// Re-exports for convenience
pub use check::{Check, CheckId, Severity, Verdict};
pub use config::Config;
pub use context::{Context, ContextProvider, FactSnapshot};
pub use evaluator::{Evaluator, Selector};
pub use registry::Registry;
pub use report::Report;
pub use runner::Runner;
