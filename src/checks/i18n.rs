//! Intl extension check.

use crate::check::{BadgeColor, Check, CheckId, Severity, Verdict};
use crate::context::{keys, Context};
use crate::error::CheckEvaluationFault;

/// Reports whether the Intl extension is loaded.
///
/// Only applicable when the site runs a locale other than the default one.
pub struct IntlCheck {
    id: CheckId,
    default_locale: String,
}

impl IntlCheck {
    pub const ID: &'static str = "i18n_check";

    /// Create a check that is inapplicable for `default_locale`.
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            id: CheckId::from_static(Self::ID),
            default_locale: default_locale.into(),
        }
    }
}

impl Check for IntlCheck {
    fn id(&self) -> &CheckId {
        &self.id
    }

    fn label(&self) -> &str {
        "I18n Extension Test"
    }

    fn category(&self) -> &str {
        super::INTERNATIONALIZATION
    }

    fn applicable(&self, ctx: &dyn Context) -> bool {
        ctx.text(keys::LOCALE)
            .is_some_and(|locale| locale != self.default_locale)
    }

    fn evaluate(&self, ctx: &dyn Context) -> Result<Verdict, CheckEvaluationFault> {
        let verdict = if ctx.flag(keys::INTL_LOADED).unwrap_or(false) {
            Verdict::builder(self.id.clone(), Severity::Good)
                .title("Your site uses Intl extension")
                .detail(
                    "Your site uses PHP Intl extension to improve localization features. That's great.",
                )
        } else {
            Verdict::builder(self.id.clone(), Severity::Recommended)
                .title("You should use Intl extension")
                .detail(
                    "You should consider using PHP Intl extension. It would improve localization features on your site.",
                )
        };

        Ok(verdict
            .category(self.category())
            .badge(BadgeColor::Blue)
            .build())
    }
}
