//! Check contract and the types a check produces.
//!
//! A [`Check`] is a named, independently evaluable rule. Given a read-only
//! [`Context`], it produces exactly one [`Verdict`] or a
//! [`CheckEvaluationFault`]; the evaluator turns faults into verdicts, so a
//! check never needs to guard against its own failures.
//!
//! # Example
//!
//! ```rust
//! use sitehealth::check::{Check, CheckId, Severity, Verdict};
//! use sitehealth::context::Context;
//! use sitehealth::error::CheckEvaluationFault;
//!
//! struct AlwaysGood(CheckId);
//!
//! impl Check for AlwaysGood {
//!     fn id(&self) -> &CheckId { &self.0 }
//!     fn category(&self) -> &str { "demo" }
//!
//!     fn evaluate(&self, _ctx: &dyn Context) -> Result<Verdict, CheckEvaluationFault> {
//!         Ok(Verdict::builder(self.0.clone(), Severity::Good)
//!             .title("All good")
//!             .category(self.category())
//!             .build())
//!     }
//! }
//! ```

mod severity;
mod verdict;

use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::Serialize;

use crate::context::Context;
use crate::error::CheckEvaluationFault;

pub use severity::{BadgeColor, Severity};
pub use verdict::{Verdict, VerdictBuilder};

/// Category used for verdicts synthesized from faults.
pub const INTERNAL_CATEGORY: &str = "internal";

/// Opaque check identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CheckId(Cow<'static, str>);

impl CheckId {
    /// Create from any string.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Create from a static string (no allocation).
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CheckId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CheckId {
    fn from(id: &str) -> Self {
        Self(Cow::Owned(id.to_string()))
    }
}

impl From<String> for CheckId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

/// A named, pure evaluation unit.
///
/// Checks must be side-effect free with respect to each other: the
/// evaluator may run them on separate threads.
pub trait Check: Send + Sync {
    /// Unique identifier within a registry.
    fn id(&self) -> &CheckId;

    /// Human name of the test (e.g. "Object Cache Test").
    fn label(&self) -> &str {
        self.id().as_str()
    }

    /// Free-form grouping label, e.g. "performance".
    fn category(&self) -> &str;

    /// Whether this check has anything to say in `ctx`.
    ///
    /// Inapplicable checks are skipped and produce no verdict.
    fn applicable(&self, _ctx: &dyn Context) -> bool {
        true
    }

    /// Evaluate against `ctx`, producing exactly one verdict.
    fn evaluate(&self, ctx: &dyn Context) -> Result<Verdict, CheckEvaluationFault>;
}
