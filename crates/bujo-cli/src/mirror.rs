//! File-backed entry mirror with first-run demo seeding.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};

use bujo_core::journal::MirrorStore;
use bujo_core::{EntryDraft, EntryKind, JournalEntry};

/// Entry mirror persisted as a single JSON file.
///
/// The first read of a missing file seeds a few demo entries so a fresh
/// install has something to show; an existing (even empty) file is left
/// alone.
pub struct FileMirror {
    path: PathBuf,
}

impl FileMirror {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn seed(&self) -> Option<String> {
        let raw = serde_json::to_string(&demo_entries()).ok()?;
        self.write(&raw);
        Some(raw)
    }
}

impl MirrorStore for FileMirror {
    fn read(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => self.seed(),
            Err(error) => {
                tracing::warn!("failed to read entry mirror {}: {error}", self.path.display());
                None
            }
        }
    }

    fn write(&self, raw: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create mirror directory: {error}");
                return;
            }
        }
        if let Err(error) = std::fs::write(&self.path, raw) {
            tracing::warn!("failed to write entry mirror {}: {error}", self.path.display());
        }
    }
}

fn demo_entries() -> Vec<JournalEntry> {
    let mut run = JournalEntry::from_draft(EntryDraft::new(EntryKind::Task, "Morning run"));
    run.notes = Some("5k around the park".to_string());

    let ideas = JournalEntry::from_draft(EntryDraft::new(
        EntryKind::Note,
        "Ideas for the weekend project",
    ));

    let mut appointment =
        JournalEntry::from_draft(EntryDraft::new(EntryKind::Event, "Doctor appointment"));
    appointment.date = Some((Utc::now() + Duration::days(1)).date_naive());

    vec![run, ideas, appointment]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_read_seeds_demo_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path().join("entries.json"));

        let raw = mirror.read().unwrap();
        let entries: Vec<JournalEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().any(|e| e.title == "Morning run"));
        assert!(entries.iter().any(|e| e.kind == EntryKind::Event));

        // The seed was persisted; later reads return the same content.
        assert_eq!(mirror.read().unwrap(), raw);
    }

    #[test]
    fn existing_file_is_not_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        std::fs::write(&path, "[]").unwrap();

        let mirror = FileMirror::new(path);
        assert_eq!(mirror.read().unwrap(), "[]");
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("entries.json");

        let mirror = FileMirror::new(path.clone());
        mirror.write("[]");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }
}
