//! Entry synchronizer: an optimistic local mirror reconciled with the
//! remote journal store.
//!
//! Every operation applies to the local mirror first and returns
//! synchronously; when a session exists it also yields a [`Reconciliation`]
//! the caller may await to push the change to the server and fold the
//! server-confirmed record back in. Remote failures never roll back local
//! state: the mirror is the optimistic source of truth.

mod normalize;
mod remote;

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::models::{EntryDraft, EntryId, EntryPatch, JournalEntry};

pub use normalize::{decode_entry, decode_entry_list, ServerRecord};
pub use remote::HttpRemoteJournal;

/// Key-value persistence for the serialized entry mirror.
///
/// Implementations must never fail observably: a read of corrupt or absent
/// data yields `None`/garbage that the journal recovers from, and write
/// failures are logged by the implementation.
pub trait MirrorStore: Send + Sync {
    /// Raw stored JSON, or `None` when nothing was persisted yet.
    fn read(&self) -> Option<String>;
    /// Persist the serialized mirror, best-effort.
    fn write(&self, raw: &str);
}

/// In-memory mirror used in tests and in contexts without persistent
/// storage, where the journal behaves as an empty, non-durable mirror.
#[derive(Debug, Clone, Default)]
pub struct MemoryMirror {
    raw: Arc<Mutex<Option<String>>>,
}

impl MemoryMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-seeded raw JSON, as if it had been persisted earlier.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }
}

impl MirrorStore for MemoryMirror {
    fn read(&self) -> Option<String> {
        self.raw.lock().ok()?.clone()
    }

    fn write(&self, raw: &str) {
        if let Ok(mut guard) = self.raw.lock() {
            *guard = Some(raw.to_string());
        }
    }
}

/// The remote side of the synchronizer.
pub trait RemoteJournal {
    /// Whether a valid session exists; when false, operations act on the
    /// local mirror only and no remote call is attempted.
    fn is_available(&self) -> bool;
    async fn fetch_all(&self) -> Result<Vec<JournalEntry>>;
    async fn create(&self, entry: &JournalEntry) -> Result<ServerRecord>;
    async fn update(&self, id: &EntryId, entry: &JournalEntry) -> Result<ServerRecord>;
    async fn delete(&self, id: &EntryId) -> Result<()>;
    async fn toggle(&self, id: &EntryId) -> Result<ServerRecord>;
}

/// A pending remote push produced by a local mutation.
///
/// Holds the revision observed at dispatch time so a slow server echo can
/// be recognized as stale and discarded instead of clobbering newer edits.
#[derive(Debug, Clone)]
pub enum Reconciliation {
    Create {
        temp_id: EntryId,
        revision: u64,
        entry: JournalEntry,
    },
    Update {
        id: EntryId,
        revision: u64,
        entry: JournalEntry,
    },
    Toggle {
        id: EntryId,
        revision: u64,
    },
    Delete {
        id: EntryId,
    },
}

/// What happened when a reconciliation was awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Server-confirmed record folded into the mirror.
    Synced(JournalEntry),
    /// Remote call failed; the optimistic local state stays authoritative.
    KeptLocal,
    /// Server echo discarded: a newer local revision superseded it, or the
    /// record was removed in the meantime.
    Stale,
    /// Remote delete confirmed.
    Deleted,
}

/// The entry synchronizer.
pub struct Journal<M: MirrorStore, R: RemoteJournal> {
    mirror: M,
    remote: R,
    entries: Vec<JournalEntry>,
}

impl<M: MirrorStore, R: RemoteJournal> Journal<M, R> {
    /// Load the mirror; corrupt stored JSON recovers to an empty mirror.
    pub fn new(mirror: M, remote: R) -> Self {
        let entries = match mirror.read() {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!("discarding corrupt entry mirror: {error}");
                    Vec::new()
                }
            },
        };
        Self {
            mirror,
            remote,
            entries,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// The mirror, newest first.
    #[must_use]
    pub fn list_local(&self) -> Vec<JournalEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    /// List entries. With a session, the remote result replaces the whole
    /// mirror (even when empty); any remote failure falls back to the
    /// current mirror unchanged.
    pub async fn list(&mut self) -> Vec<JournalEntry> {
        if self.remote.is_available() {
            match self.remote.fetch_all().await {
                Ok(remote_entries) => {
                    self.entries = remote_entries;
                    self.persist();
                }
                Err(error) => {
                    tracing::warn!("remote fetch failed, serving local mirror: {error}");
                }
            }
        }
        self.list_local()
    }

    /// Create an entry locally and return it immediately, with a pending
    /// remote create when a session exists.
    pub fn add(&mut self, draft: EntryDraft) -> (JournalEntry, Option<Reconciliation>) {
        let entry = JournalEntry::from_draft(draft);
        self.entries.insert(0, entry.clone());
        self.persist();
        let pending = self.remote.is_available().then(|| Reconciliation::Create {
            temp_id: entry.id.clone(),
            revision: entry.revision,
            entry: entry.clone(),
        });
        (entry, pending)
    }

    /// Apply a merged patch locally; `None` when the id is unknown.
    pub fn update(
        &mut self,
        id: &EntryId,
        patch: EntryPatch,
    ) -> Option<(JournalEntry, Option<Reconciliation>)> {
        let position = self.entries.iter().position(|entry| &entry.id == id)?;
        self.entries[position].apply_patch(patch);
        let entry = self.entries[position].clone();
        self.persist();
        let pending = self.remote.is_available().then(|| Reconciliation::Update {
            id: id.clone(),
            revision: entry.revision,
            entry: entry.clone(),
        });
        Some((entry, pending))
    }

    /// Remove an entry locally. Returns whether a record was found; the
    /// local removal stands even if the remote delete later fails.
    pub fn remove(&mut self, id: &EntryId) -> (bool, Option<Reconciliation>) {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        let removed = self.entries.len() != before;
        if !removed {
            return (false, None);
        }
        self.persist();
        let pending = self
            .remote
            .is_available()
            .then(|| Reconciliation::Delete { id: id.clone() });
        (true, pending)
    }

    /// Flip the completion flag; `None` when the id is unknown, in which
    /// case nothing is mutated.
    pub fn toggle_complete(
        &mut self,
        id: &EntryId,
    ) -> Option<(JournalEntry, Option<Reconciliation>)> {
        let position = self.entries.iter().position(|entry| &entry.id == id)?;
        let flipped = !self.entries[position].is_completed();
        self.entries[position].apply_patch(EntryPatch {
            completed: Some(flipped),
            ..EntryPatch::default()
        });
        let entry = self.entries[position].clone();
        self.persist();
        let pending = self.remote.is_available().then(|| Reconciliation::Toggle {
            id: id.clone(),
            revision: entry.revision,
        });
        Some((entry, pending))
    }

    /// Await a pending remote push and fold the server response back into
    /// the mirror, unless a newer local revision superseded it.
    pub async fn reconcile(&mut self, pending: Reconciliation) -> ReconcileOutcome {
        match pending {
            Reconciliation::Create {
                temp_id,
                revision,
                entry,
            } => match self.remote.create(&entry).await {
                Ok(server) => self.apply_created(&temp_id, revision, server),
                Err(error) => {
                    tracing::warn!("remote create failed, keeping local entry {temp_id}: {error}");
                    ReconcileOutcome::KeptLocal
                }
            },
            Reconciliation::Update {
                id,
                revision,
                entry,
            } => match self.remote.update(&id, &entry).await {
                Ok(server) => self.apply_confirmed(&id, revision, server),
                Err(error) => {
                    tracing::warn!("remote update failed, keeping local entry {id}: {error}");
                    ReconcileOutcome::KeptLocal
                }
            },
            Reconciliation::Toggle { id, revision } => match self.remote.toggle(&id).await {
                Ok(server) => self.apply_confirmed(&id, revision, server),
                Err(error) => {
                    tracing::warn!("remote toggle failed, keeping local entry {id}: {error}");
                    ReconcileOutcome::KeptLocal
                }
            },
            Reconciliation::Delete { id } => match self.remote.delete(&id).await {
                Ok(()) => ReconcileOutcome::Deleted,
                Err(error) => {
                    // Local deletion is not rolled back; the stores diverge.
                    tracing::warn!("remote delete failed for {id}: {error}");
                    ReconcileOutcome::KeptLocal
                }
            },
        }
    }

    /// Server confirmation of a create: replace the temporary record, or
    /// append when an intervening operation already removed it.
    fn apply_created(
        &mut self,
        temp_id: &EntryId,
        revision: u64,
        server: ServerRecord,
    ) -> ReconcileOutcome {
        match self.entries.iter().position(|entry| &entry.id == temp_id) {
            Some(position) => {
                if self.entries[position].revision != revision {
                    return ReconcileOutcome::Stale;
                }
                // Server-assigned id and timestamps supersede the temp record.
                let merged = merge_server(&self.entries[position], server, false);
                self.entries[position] = merged.clone();
                self.persist();
                ReconcileOutcome::Synced(merged)
            }
            None => {
                let entry = server.into_entry();
                self.entries.push(entry.clone());
                self.persist();
                ReconcileOutcome::Synced(entry)
            }
        }
    }

    /// Server confirmation of an update/toggle, guarded by the revision
    /// captured at dispatch time.
    fn apply_confirmed(
        &mut self,
        id: &EntryId,
        revision: u64,
        server: ServerRecord,
    ) -> ReconcileOutcome {
        let Some(position) = self.entries.iter().position(|entry| &entry.id == id) else {
            return ReconcileOutcome::Stale;
        };
        if self.entries[position].revision != revision {
            tracing::debug!("discarding stale server echo for {id}");
            return ReconcileOutcome::Stale;
        }
        let merged = merge_server(&self.entries[position], server, true);
        self.entries[position] = merged.clone();
        self.persist();
        ReconcileOutcome::Synced(merged)
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(raw) => self.mirror.write(&raw),
            Err(error) => tracing::warn!("failed to serialize entry mirror: {error}"),
        }
    }
}

/// Overwrite a local record with the server's confirmed response; fields
/// the server omitted fall back to the local values, so a sparse echo
/// (say, id plus the toggled flag) cannot erase a title or kind.
/// `created_at` is kept local for updates (it is immutable after creation)
/// but taken from the server for create confirmations.
fn merge_server(local: &JournalEntry, server: ServerRecord, keep_created_at: bool) -> JournalEntry {
    JournalEntry {
        id: server.id,
        kind: server.kind.unwrap_or(local.kind),
        title: server.title.unwrap_or_else(|| local.title.clone()),
        notes: server.notes.or_else(|| local.notes.clone()),
        completed: server.completed.or(local.completed),
        date: server.date.or(local.date),
        created_at: if keep_created_at {
            local.created_at
        } else {
            server.created_at.unwrap_or(local.created_at)
        },
        updated_at: server.updated_at.or(local.updated_at),
        tags: server.tags.or_else(|| local.tags.clone()),
        revision: local.revision,
    }
}
