//! Fact values and the in-memory snapshot.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Context;

/// A single ambient fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl FactValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FactValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FactValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            FactValue::Int(n) => write!(f, "{}", n),
            FactValue::Text(s) => f.write_str(s),
            FactValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

impl From<i64> for FactValue {
    fn from(n: i64) -> Self {
        FactValue::Int(n)
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Text(s.to_string())
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::Text(s)
    }
}

impl From<Vec<String>> for FactValue {
    fn from(items: Vec<String>) -> Self {
        FactValue::List(items)
    }
}

/// Immutable set of facts gathered before a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FactSnapshot {
    facts: BTreeMap<String, FactValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gathered_at: Option<DateTime<Utc>>,
}

impl FactSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot builder.
    pub fn builder() -> FactSnapshotBuilder {
        FactSnapshotBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate facts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactValue)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// When the provider finished gathering, if stamped.
    pub fn gathered_at(&self) -> Option<DateTime<Utc>> {
        self.gathered_at
    }
}

impl Context for FactSnapshot {
    fn get_fact(&self, key: &str) -> Option<&FactValue> {
        self.facts.get(key)
    }
}

/// Builder for [`FactSnapshot`].
#[derive(Debug, Default)]
pub struct FactSnapshotBuilder {
    facts: BTreeMap<String, FactValue>,
    stamp: bool,
}

impl FactSnapshotBuilder {
    /// Set a fact, replacing any previous value.
    pub fn fact(mut self, key: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.facts.insert(key.into(), value.into());
        self
    }

    /// Set a fact only when a value is present.
    pub fn fact_opt(self, key: impl Into<String>, value: Option<impl Into<FactValue>>) -> Self {
        match value {
            Some(v) => self.fact(key, v),
            None => self,
        }
    }

    /// Record the gathering time on build.
    pub fn stamped(mut self) -> Self {
        self.stamp = true;
        self
    }

    pub fn build(self) -> FactSnapshot {
        FactSnapshot {
            facts: self.facts,
            gathered_at: self.stamp.then(Utc::now),
        }
    }
}
