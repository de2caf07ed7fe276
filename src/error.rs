//! Error types.
//!
//! Only registration-time errors reach callers synchronously. Per-check
//! faults ([`CheckEvaluationFault`]) are recovered by the evaluator and
//! reported as `critical` verdicts in the `internal` category.

use std::fmt;
use std::time::Duration;

use crate::check::CheckId;

/// A check with the same id is already registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCheckError {
    pub id: CheckId,
}

impl fmt::Display for DuplicateCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "check '{}' is already registered", self.id)
    }
}

impl std::error::Error for DuplicateCheckError {}

/// No check with this id exists in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCheckId {
    pub id: CheckId,
}

impl fmt::Display for UnknownCheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown check '{}'", self.id)
    }
}

impl std::error::Error for UnknownCheckId {}

/// Failure inside a single check's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckEvaluationFault {
    /// A required fact is absent from the context.
    MissingFact { key: String },

    /// A fact has a value the check has no verdict for.
    UnexpectedFact { key: String, value: String },

    /// The check returned a verdict tagged with another id.
    MismatchedVerdict { expected: CheckId, found: CheckId },

    /// The check panicked.
    Panicked(String),

    /// Any other failure.
    Other(String),
}

impl CheckEvaluationFault {
    /// Short kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckEvaluationFault::MissingFact { .. } => "missing_fact",
            CheckEvaluationFault::UnexpectedFact { .. } => "unexpected_fact",
            CheckEvaluationFault::MismatchedVerdict { .. } => "mismatched_verdict",
            CheckEvaluationFault::Panicked(_) => "panicked",
            CheckEvaluationFault::Other(_) => "other",
        }
    }
}

impl fmt::Display for CheckEvaluationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckEvaluationFault::MissingFact { key } => {
                write!(f, "required fact '{}' is not available", key)
            }
            CheckEvaluationFault::UnexpectedFact { key, value } => {
                write!(f, "no verdict for {}='{}'", key, value)
            }
            CheckEvaluationFault::MismatchedVerdict { expected, found } => {
                write!(
                    f,
                    "verdict tagged '{}' returned by check '{}'",
                    found, expected
                )
            }
            CheckEvaluationFault::Panicked(msg) => write!(f, "check panicked: {}", msg),
            CheckEvaluationFault::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CheckEvaluationFault {}

impl From<String> for CheckEvaluationFault {
    fn from(msg: String) -> Self {
        CheckEvaluationFault::Other(msg)
    }
}

impl From<&str> for CheckEvaluationFault {
    fn from(msg: &str) -> Self {
        CheckEvaluationFault::Other(msg.to_string())
    }
}

/// Context provider failure.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider configuration can't be used.
    Invalid { key: String, message: String },

    /// I/O error while gathering facts.
    Io(std::io::Error),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Invalid { key, message } => {
                write!(f, "invalid provider setting {}: {}", key, message)
            }
            ProviderError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(e: std::io::Error) -> Self {
        ProviderError::Io(e)
    }
}

/// Host-level run failure. Never produced by a check.
#[derive(Debug)]
pub enum RunError {
    /// Facts could not be gathered.
    Provider(ProviderError),

    /// The run did not finish within the deadline; any late report is discarded.
    DeadlineExceeded(Duration),

    /// The evaluation task was cancelled or aborted.
    Join(String),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Provider(e) => write!(f, "context provider failed: {}", e),
            RunError::DeadlineExceeded(d) => {
                write!(f, "run exceeded deadline of {}ms", d.as_millis())
            }
            RunError::Join(msg) => write!(f, "evaluation task failed: {}", msg),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Provider(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProviderError> for RunError {
    fn from(e: ProviderError) -> Self {
        RunError::Provider(e)
    }
}
