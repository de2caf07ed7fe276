//! Severity levels and badge colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered health level of a verdict.
///
/// The derived ordering is the health ordering: `Good < Recommended < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing to do.
    Good,
    /// Works, but an improvement is suggested.
    Recommended,
    /// Needs attention.
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 3] = [Severity::Good, Severity::Recommended, Severity::Critical];

    /// Get the lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Recommended => "recommended",
            Self::Critical => "critical",
        }
    }

    /// Numeric rank (0, 1, 2), used for gauges.
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Good => 0,
            Self::Recommended => 1,
            Self::Critical => 2,
        }
    }

    /// Badge color used when a check doesn't pick one.
    pub const fn default_badge(&self) -> BadgeColor {
        match self {
            Self::Good => BadgeColor::Blue,
            Self::Recommended => BadgeColor::Orange,
            Self::Critical => BadgeColor::Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "recommended" => Ok(Self::Recommended),
            "critical" => Ok(Self::Critical),
            other => Err(format!(
                "unknown severity '{}', expected: good, recommended, critical",
                other
            )),
        }
    }
}

/// Badge color shown next to a verdict's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Blue,
    Orange,
    Red,
}

impl fmt::Display for BadgeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blue => write!(f, "blue"),
            Self::Orange => write!(f, "orange"),
            Self::Red => write!(f, "red"),
        }
    }
}
