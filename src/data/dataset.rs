use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::data::datetime;

pub const TIMESTAMP_FIELD: &str = "Timestamp";
pub const ID_FIELD: &str = "ID";
/// Suffix of the companion field holding a series' smoothed value.
pub const TREND_SUFFIX: &str = "_trend";

/// Name of the trend companion of `column`.
pub fn trend_key(column: &str) -> String {
    format!("{column}{TREND_SUFFIX}")
}

/// One sample as sent by the backend. Field order is kept as received.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Map<String, Value>,
}

impl Row {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.fields.get(TIMESTAMP_FIELD).and_then(datetime::timestamp_from_json)
    }

    /// Axis label for this row: the local-time rendering of its timestamp,
    /// or the raw value when it cannot be read as a date.
    pub fn timestamp_label(&self) -> String {
        if let Some(ts) = self.timestamp() {
            return datetime::format_local(&ts);
        }
        match self.fields.get(TIMESTAMP_FIELD) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Numeric value of `key`. Missing, null and non-numeric fields are `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }
}

/// The rows of one `/data` response, in server order (newest first).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn from_json_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in display order: oldest first.
    pub fn oldest_first(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().rev()
    }
}
