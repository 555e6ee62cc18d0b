//! Journal entry model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const LOCAL_ID_LENGTH: usize = 8;

/// A unique identifier for a journal entry.
///
/// Locally generated ids are short random base-36 strings; they are only
/// probabilistically unique, which is acceptable because they are superseded
/// by server-assigned ids once a remote create succeeds. Server ids of any
/// non-empty shape are accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    /// Generate a fresh short base-36 local id.
    #[must_use]
    pub fn generate() -> Self {
        let mut value = Uuid::now_v7().as_u128();
        let mut id = String::with_capacity(LOCAL_ID_LENGTH);
        for _ in 0..LOCAL_ID_LENGTH {
            let digit = u32::try_from(value % 36).unwrap_or(0);
            id.push(char::from_digit(digit, 36).unwrap_or('0'));
            value /= 36;
        }
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("entry id must not be empty")]
pub struct EmptyEntryId;

impl FromStr for EntryId {
    type Err = EmptyEntryId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(EmptyEntryId)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

/// Kind of journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Task,
    Note,
    Event,
    Habit,
    Emotion,
}

impl EntryKind {
    /// Parse a remote kind string, case-insensitively. Unknown or absent
    /// kinds normalize to [`EntryKind::Note`].
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "task" => Self::Task,
            "event" => Self::Event,
            "habit" => Self::Habit,
            "emotion" => Self::Emotion,
            _ => Self::Note,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Note => "note",
            Self::Event => "event",
            Self::Habit => "habit",
            Self::Emotion => "emotion",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A journal entry as held in the local mirror.
///
/// `created_at` never changes after creation; `updated_at`, when present, is
/// always at or after `created_at`. `revision` counts local mutations and is
/// used to discard stale server echoes during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub revision: u64,
}

impl JournalEntry {
    /// Create a local optimistic record from user input.
    #[must_use]
    pub fn from_draft(draft: EntryDraft) -> Self {
        Self {
            id: EntryId::generate(),
            kind: draft.kind,
            title: draft.title,
            notes: draft.notes,
            completed: draft.completed,
            date: draft.date,
            created_at: Utc::now(),
            updated_at: None,
            tags: draft.tags,
            revision: 0,
        }
    }

    /// Apply a merged patch: present fields override one by one,
    /// `updated_at` is set to now and the local revision is bumped.
    pub fn apply_patch(&mut self, patch: EntryPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        if let Some(completed) = patch.completed {
            self.completed = Some(completed);
        }
        if let Some(date) = patch.date {
            self.date = Some(date);
        }
        if let Some(tags) = patch.tags {
            self.tags = Some(tags);
        }
        self.updated_at = Some(Utc::now());
        self.revision += 1;
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// User input for creating a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub title: String,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl EntryDraft {
    #[must_use]
    pub fn new(kind: EntryKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            notes: None,
            completed: None,
            date: None,
            tags: None,
        }
    }
}

/// A partial update; absent fields leave the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub kind: Option<EntryKind>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_short_base36() {
        let id = EntryId::generate();
        assert_eq!(id.as_str().len(), 8);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(EntryId::generate(), EntryId::generate());
    }

    #[test]
    fn entry_id_rejects_empty() {
        assert_eq!("  ".parse::<EntryId>(), Err(EmptyEntryId));
        assert_eq!("42".parse::<EntryId>().unwrap().as_str(), "42");
    }

    #[test]
    fn kind_parse_lenient_lowercases_and_defaults() {
        assert_eq!(EntryKind::parse_lenient("NOTE"), EntryKind::Note);
        assert_eq!(EntryKind::parse_lenient("Task"), EntryKind::Task);
        assert_eq!(EntryKind::parse_lenient("emotion"), EntryKind::Emotion);
        assert_eq!(EntryKind::parse_lenient("mystery"), EntryKind::Note);
    }

    #[test]
    fn from_draft_sets_creation_fields() {
        let before = Utc::now();
        let entry = JournalEntry::from_draft(EntryDraft::new(EntryKind::Task, "Buy milk"));
        assert!(!entry.id.as_str().is_empty());
        assert_eq!(entry.title, "Buy milk");
        assert!(entry.created_at >= before);
        assert!(entry.updated_at.is_none());
        assert_eq!(entry.revision, 0);
        assert!(!entry.is_completed());
    }

    #[test]
    fn apply_patch_overrides_fields_and_bumps_revision() {
        let mut entry = JournalEntry::from_draft(EntryDraft::new(EntryKind::Task, "Buy milk"));
        entry.apply_patch(EntryPatch {
            title: Some("Buy oat milk".to_string()),
            completed: Some(true),
            ..EntryPatch::default()
        });

        assert_eq!(entry.title, "Buy oat milk");
        assert_eq!(entry.completed, Some(true));
        assert_eq!(entry.kind, EntryKind::Task);
        assert_eq!(entry.revision, 1);
        let updated = entry.updated_at.expect("updated_at set");
        assert!(updated >= entry.created_at);
    }

    #[test]
    fn entry_serializes_with_wire_field_names() {
        let entry = JournalEntry::from_draft(EntryDraft::new(EntryKind::Habit, "Meditate"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "habit");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }
}
