//! OPcache check.

use crate::check::{Check, CheckId, Severity, Verdict};
use crate::context::{keys, Context};
use crate::error::CheckEvaluationFault;

/// Reports whether the OPcache bytecode cache is available.
///
/// A missing `opcache_enabled` fact means OPcache could not be detected,
/// which is reported the same as "disabled".
pub struct OpcacheCheck {
    id: CheckId,
}

impl OpcacheCheck {
    pub const ID: &'static str = "opcache";

    pub fn new() -> Self {
        Self {
            id: CheckId::from_static(Self::ID),
        }
    }
}

impl Default for OpcacheCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for OpcacheCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn label(&self) -> &str {
        "OPcache Test"
    }

    fn category(&self) -> &str {
        super::PERFORMANCE
    }

    fn evaluate(&self, ctx: &dyn Context) -> Result<Verdict, CheckEvaluationFault> {
        let verdict = if ctx.flag(keys::OPCACHE_ENABLED).unwrap_or(false) {
            Verdict::builder(self.id.clone(), Severity::Good)
                .title("Your site uses OPcache")
                .detail("Your site uses OPcache to improve PHP performance. That's great.")
        } else {
            Verdict::builder(self.id.clone(), Severity::Recommended)
                .title("You should use OPcache")
                .detail(
                    "You should consider using OPcache. It would improve PHP performance of your site.",
                )
                .action("Enable the opcache extension (opcache.enable=1)")
        };

        Ok(verdict.category(self.category()).build())
    }
}
