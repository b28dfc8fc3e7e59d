//! Ordered JSON log records.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::observability::value::LogValue;

/// A flat mapping from field name to JSON value, kept in insertion order.
///
/// Values are coerced on insertion, so rendering a record cannot fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Map<String, Value>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<LogValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<LogValue>) {
        self.fields.insert(key.into(), value.into().into_json());
    }

    /// Merge `other` into this record. Keys in `other` win on collision.
    pub fn merge(&mut self, other: LogRecord) {
        for (key, value) in other.fields {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> String {
        // Serializing a string-keyed map of values cannot fail.
        serde_json::to_string(&self.fields).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<LogValue>> FromIterator<(K, V)> for LogRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = LogRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
