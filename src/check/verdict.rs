//! Verdict: the structured outcome of one check.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BadgeColor, CheckId, Severity};

/// Result of evaluating one check.
///
/// Fields are private: a verdict can't change after [`VerdictBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    check_id: CheckId,
    severity: Severity,
    title: String,
    detail: String,
    category: String,
    badge_color: BadgeColor,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    actions: Vec<String>,
    evaluated_at: DateTime<Utc>,
}

impl Verdict {
    /// Start building a verdict for `check_id` with the given severity.
    pub fn builder(check_id: CheckId, severity: Severity) -> VerdictBuilder {
        VerdictBuilder::new(check_id, severity)
    }

    #[inline]
    pub fn check_id(&self) -> &CheckId {
        &self.check_id
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Short human summary.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Longer plain-text explanation.
    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[inline]
    pub fn badge_color(&self) -> BadgeColor {
        self.badge_color
    }

    /// Suggested follow-up actions, possibly empty.
    #[inline]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    #[inline]
    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    /// Compare everything except `evaluated_at`.
    pub fn same_outcome(&self, other: &Verdict) -> bool {
        self.check_id == other.check_id
            && self.severity == other.severity
            && self.title == other.title
            && self.detail == other.detail
            && self.category == other.category
            && self.badge_color == other.badge_color
            && self.actions == other.actions
    }
}

/// Builder for [`Verdict`].
#[derive(Debug)]
pub struct VerdictBuilder {
    check_id: CheckId,
    severity: Severity,
    title: String,
    detail: String,
    category: String,
    badge_color: Option<BadgeColor>,
    actions: Vec<String>,
}

impl VerdictBuilder {
    fn new(check_id: CheckId, severity: Severity) -> Self {
        Self {
            check_id,
            severity,
            title: String::new(),
            detail: String::new(),
            category: String::new(),
            badge_color: None,
            actions: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Override the severity-derived badge color.
    pub fn badge(mut self, color: BadgeColor) -> Self {
        self.badge_color = Some(color);
        self
    }

    /// Append a suggested action.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Build the verdict, stamping the evaluation time.
    pub fn build(self) -> Verdict {
        Verdict {
            badge_color: self
                .badge_color
                .unwrap_or_else(|| self.severity.default_badge()),
            check_id: self.check_id,
            severity: self.severity,
            title: self.title,
            detail: self.detail,
            category: self.category,
            actions: self.actions,
            evaluated_at: Utc::now(),
        }
    }
}
