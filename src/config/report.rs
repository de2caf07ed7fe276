//! Report selection, output and exit policy.

use std::time::Duration;

use super::parse::{env_duration, env_opt, env_or, env_parse, parse_id_list};
use super::ConfigError;
use crate::check::Severity;
use crate::evaluator::Selector;

/// Output format for one-shot runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                key: "REPORT_FORMAT".into(),
                message: format!("expected text or json, got '{}'", other),
            }),
        }
    }
}

/// Parse a FAIL_ON value: a severity name, or "off"/"none" to disable.
pub(crate) fn parse_fail_on(s: &str) -> Result<Option<Severity>, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "off" | "none" | "" => Ok(None),
        other => other
            .parse::<Severity>()
            .map(Some)
            .map_err(|error| ConfigError::Parse {
                key: "FAIL_ON".into(),
                value: s.to_string(),
                error,
            }),
    }
}

/// Report configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    /// Output format (REPORT_FORMAT).
    pub format: OutputFormat,
    /// Checks to run (CHECKS); None runs everything.
    pub selector: Option<Selector>,
    /// Threshold at or above which a run counts as failed (FAIL_ON).
    pub fail_on: Option<Severity>,
    /// Evaluator worker threads (CHECK_PARALLELISM).
    pub parallelism: usize,
    /// Deadline for a whole run (RUN_TIMEOUT).
    pub run_timeout: Option<Duration>,
}

impl ReportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let parallelism: usize = env_parse("CHECK_PARALLELISM", 1)?;
        if parallelism == 0 {
            return Err(ConfigError::Invalid {
                key: "CHECK_PARALLELISM".into(),
                message: "must be at least 1".into(),
            });
        }

        Ok(Self {
            format: OutputFormat::parse(&env_or("REPORT_FORMAT", "text"))?,
            selector: env_opt("CHECKS").and_then(|s| parse_id_list(&s)),
            fail_on: parse_fail_on(&env_or("FAIL_ON", "critical"))?,
            parallelism,
            run_timeout: env_duration("RUN_TIMEOUT", "30s")?,
        })
    }
}
