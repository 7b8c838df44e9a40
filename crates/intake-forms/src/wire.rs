//! JSON shapes exchanged with the intake endpoint

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Key under which the server stamps the acceptance time
pub const RECORD_DATE_KEY: &str = "date";

/// Field values captured from the form at submit time, in document order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeSubmission(IndexMap<String, String>);

impl IntakeSubmission {
    /// Empty submission
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field value; replacing keeps the field's position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value of one field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field was captured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate name/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for IntakeSubmission {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One stored submission: the submitted fields plus the server's `date`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeRecord(Map<String, Value>);

impl IntakeRecord {
    /// Stamp submitted fields with the acceptance time.
    ///
    /// Any client-supplied `date` is overwritten.
    pub fn stamp(mut fields: Map<String, Value>, at: DateTime<Utc>) -> Self {
        fields.insert(
            RECORD_DATE_KEY.to_string(),
            Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Self(fields)
    }

    /// The server-assigned timestamp
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.0
            .get(RECORD_DATE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }

    /// A stored field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// All stored fields, `date` included
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Successful acknowledgment: `{"status": "ok"}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IntakeAck {
    /// Always `ok`
    pub status: String,
}

impl IntakeAck {
    /// The only success acknowledgment
    pub fn ok() -> Self {
        Self { status: "ok".into() }
    }

    /// True for `{"status": "ok"}`
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Failure acknowledgment: `{"error": "..."}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    /// Generic, user-presentable message
    pub error: String,
}

impl ErrorBody {
    /// Wrap a message
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
