//! Domain DTOs for the water quality records API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Whether a table row has been saved is carried by [`Row`] rather than by a
//! sentinel id, so a backend-assigned id of `0` is still a real record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Server-assigned record identifier.
pub type RecordId = i64;

/// The user-editable part of a record. Serialized on its own, this is the
/// payload of a create call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordFields {
    pub location: String,
    pub ph_level: f64,
    pub turbidity: f64,
    pub temperature: f64,
}

impl Default for RecordFields {
    /// Template for a freshly added table row.
    fn default() -> Self {
        Self {
            location: String::new(),
            ph_level: 7.0,
            turbidity: 0.0,
            temperature: 20.0,
        }
    }
}

/// A persisted water quality record as returned by the API.
///
/// The backend omits timestamps that are not set, so each one defaults to
/// `None` when absent. Timestamps carrying a UTC offset are normalized to
/// naive UTC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<NaiveDateTime>,
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    /// Accepts naive ISO-8601 date-times and RFC 3339 ones with an offset.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Ok(naive) = raw.parse::<NaiveDateTime>() {
            return Ok(Some(naive));
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.naive_utc()))
            .map_err(|e| de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}

/// Request payload for updating an existing record. Only the fields present
/// in the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turbidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl From<&RecordFields> for UpdateRecord {
    fn from(fields: &RecordFields) -> Self {
        Self {
            location: Some(fields.location.clone()),
            ph_level: Some(fields.ph_level),
            turbidity: Some(fields.turbidity),
            temperature: Some(fields.temperature),
        }
    }
}

/// One row of the records table.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Added locally and never saved.
    Unsaved(RecordFields),
    /// Mirrors a record the backend knows about.
    Persisted(Record),
}

impl Row {
    /// The backend id, or `None` for a row that was never saved.
    pub fn id(&self) -> Option<RecordId> {
        match self {
            Row::Unsaved(_) => None,
            Row::Persisted(record) => Some(record.id),
        }
    }

    pub fn is_unsaved(&self) -> bool {
        matches!(self, Row::Unsaved(_))
    }

    pub fn fields(&self) -> &RecordFields {
        match self {
            Row::Unsaved(fields) => fields,
            Row::Persisted(record) => &record.fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut RecordFields {
        match self {
            Row::Unsaved(fields) => fields,
            Row::Persisted(record) => &mut record.fields,
        }
    }
}

impl From<Record> for Row {
    fn from(record: Record) -> Self {
        Row::Persisted(record)
    }
}
