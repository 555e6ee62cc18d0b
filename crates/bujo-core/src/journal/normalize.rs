//! Canonical decoding of remote journal payloads.
//!
//! The backend wraps entry lists in several shapes (`{data:[...]}`,
//! `{entries:[...]}`, Pageable-style `{content:[...]}`, or a bare array).
//! Decoding is a single explicit step: either a validated list of canonical
//! entries, or a decode error the caller can fall back from.
//!
//! Single-record confirmations decode to a [`ServerRecord`] instead: write
//! endpoints may echo only the fields they changed, and inventing defaults
//! for the rest would clobber local state during the merge.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{EntryId, EntryKind, JournalEntry};
use crate::util::normalize_text_option;

/// Decode a list response into canonical entries.
pub fn decode_entry_list(payload: Value) -> Result<Vec<JournalEntry>> {
    let wrapper: ListPayload = serde_json::from_value(payload)
        .map_err(|error| Error::Decode(format!("entry list has unsupported shape: {error}")))?;
    Ok(wrapper
        .into_records()
        .into_iter()
        .map(|raw| into_server_record(raw).into_entry())
        .collect())
}

/// Decode a single-record response (bare object or `{data:{...}}`).
///
/// Fields the server omitted stay `None`; the caller decides whether to
/// fall back to local values or apply the listing defaults.
pub fn decode_entry(payload: Value) -> Result<ServerRecord> {
    let wrapper: RecordPayload = serde_json::from_value(payload)
        .map_err(|error| Error::Decode(format!("entry record has unsupported shape: {error}")))?;
    Ok(into_server_record(wrapper.into_record()))
}

/// A server-confirmed record: the identity plus whichever fields the
/// server chose to echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub id: EntryId,
    pub kind: Option<EntryKind>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl ServerRecord {
    /// Materialize a standalone entry, defaulting the fields the server
    /// omitted the same way the list decode does.
    #[must_use]
    pub fn into_entry(self) -> JournalEntry {
        JournalEntry {
            id: self.id,
            kind: self.kind.unwrap_or(EntryKind::Note),
            title: self.title.unwrap_or_else(|| "Untitled".to_string()),
            notes: self.notes,
            completed: Some(self.completed.unwrap_or(false)),
            date: self.date,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            updated_at: self.updated_at,
            tags: self.tags,
            revision: 0,
        }
    }
}

impl From<JournalEntry> for ServerRecord {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            kind: Some(entry.kind),
            title: Some(entry.title),
            notes: entry.notes,
            completed: entry.completed,
            date: entry.date,
            created_at: Some(entry.created_at),
            updated_at: entry.updated_at,
            tags: entry.tags,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Bare(Vec<RawEntry>),
    Data { data: Vec<RawEntry> },
    Entries { entries: Vec<RawEntry> },
    Content { content: Vec<RawEntry> },
}

impl ListPayload {
    fn into_records(self) -> Vec<RawEntry> {
        match self {
            Self::Bare(records)
            | Self::Data { data: records }
            | Self::Entries { entries: records }
            | Self::Content { content: records } => records,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordPayload {
    Data { data: RawEntry },
    Entry { entry: RawEntry },
    Bare(RawEntry),
}

impl RecordPayload {
    fn into_record(self) -> RawEntry {
        match self {
            Self::Data { data: record } | Self::Entry { entry: record } | Self::Bare(record) => {
                record
            }
        }
    }
}

/// Permissive wire shape; every field may be absent or loosely typed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    id: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    notes: Option<String>,
    completed: Option<bool>,
    date: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    tags: Option<Vec<String>>,
}

fn into_server_record(raw: RawEntry) -> ServerRecord {
    ServerRecord {
        id: raw
            .id
            .and_then(stringify_id)
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(EntryId::generate),
        kind: raw.kind.map(|kind| EntryKind::parse_lenient(&kind)),
        title: normalize_text_option(raw.title),
        notes: normalize_text_option(raw.notes),
        completed: raw.completed,
        date: raw.date.as_deref().and_then(parse_date),
        created_at: raw.created_at.as_deref().and_then(parse_datetime),
        updated_at: raw.updated_at.as_deref().and_then(parse_datetime),
        tags: raw.tags,
    }
}

fn stringify_id(value: Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // ISO datetimes are accepted for dates by taking the date prefix.
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_bare_array() {
        let entries = decode_entry_list(json!([
            {"id": "a1", "type": "task", "title": "Buy milk"}
        ]))
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_str(), "a1");
        assert_eq!(entries[0].kind, EntryKind::Task);
    }

    #[test]
    fn decodes_pageable_content_wrapper_and_canonicalizes() {
        let entries = decode_entry_list(json!({
            "content": [{"id": 1, "type": "NOTE", "title": "x"}],
            "totalPages": 1,
            "totalElements": 1
        }))
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_str(), "1");
        assert_eq!(entries[0].kind, EntryKind::Note);
        assert_eq!(entries[0].completed, Some(false));
    }

    #[test]
    fn decodes_data_and_entries_wrappers() {
        let from_data = decode_entry_list(json!({"data": [{"title": "a"}]})).unwrap();
        let from_entries = decode_entry_list(json!({"entries": [{"title": "b"}]})).unwrap();
        assert_eq!(from_data[0].title, "a");
        assert_eq!(from_entries[0].title, "b");
    }

    #[test]
    fn defaults_absent_fields() {
        let entries = decode_entry_list(json!([{}])).unwrap();
        let entry = &entries[0];
        assert!(!entry.id.as_str().is_empty());
        assert_eq!(entry.kind, EntryKind::Note);
        assert_eq!(entry.title, "Untitled");
        assert_eq!(entry.completed, Some(false));
        assert!(entry.notes.is_none());
        assert!(entry.date.is_none());
    }

    #[test]
    fn parses_dates_and_datetimes() {
        let entries = decode_entry_list(json!([{
            "title": "appointment",
            "type": "event",
            "date": "2026-03-14T00:00:00Z",
            "createdAt": "2026-03-01T09:30:00Z",
            "updatedAt": "2026-03-02T10:00:00Z"
        }]))
        .unwrap();
        let entry = &entries[0];
        assert_eq!(
            entry.date,
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
        assert_eq!(entry.created_at.to_rfc3339(), "2026-03-01T09:30:00+00:00");
        assert!(entry.updated_at.is_some());
    }

    #[test]
    fn rejects_unsupported_shapes() {
        assert!(decode_entry_list(json!({"rows": []})).is_err());
        assert!(decode_entry_list(json!("nope")).is_err());
    }

    #[test]
    fn decodes_single_record_wrappers() {
        let bare = decode_entry(json!({"id": "x", "title": "t"})).unwrap();
        let wrapped = decode_entry(json!({"data": {"id": "y", "title": "u"}})).unwrap();
        assert_eq!(bare.id.as_str(), "x");
        assert_eq!(bare.title.as_deref(), Some("t"));
        assert_eq!(wrapped.id.as_str(), "y");
    }

    #[test]
    fn single_record_decode_keeps_omitted_fields_absent() {
        let record = decode_entry(json!({"id": "x1", "completed": true})).unwrap();
        assert_eq!(record.id.as_str(), "x1");
        assert_eq!(record.completed, Some(true));
        assert_eq!(record.kind, None);
        assert_eq!(record.title, None);
        assert!(record.created_at.is_none());
    }

    #[test]
    fn materializing_a_sparse_record_applies_listing_defaults() {
        let entry = decode_entry(json!({"id": "x1"})).unwrap().into_entry();
        assert_eq!(entry.kind, EntryKind::Note);
        assert_eq!(entry.title, "Untitled");
        assert_eq!(entry.completed, Some(false));
    }
}
