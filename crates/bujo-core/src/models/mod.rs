//! Data models for Bujo

mod entry;
mod user;

pub use entry::{EmptyEntryId, EntryDraft, EntryId, EntryKind, EntryPatch, JournalEntry};
pub use user::{LoginCredentials, Session, SignupData, User};
