//! bujo-core - Core library for Bujo
//!
//! This crate contains the session manager, the optimistic entry
//! synchronizer, and the HTTP clients (journal, OCR, export) used by all
//! Bujo interfaces.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod journal;
pub mod models;
pub mod ocr;
pub mod session;
pub mod stats;
pub mod util;

pub use config::ApiConfig;
pub use error::{Error, Result};
pub use models::{EntryDraft, EntryId, EntryKind, EntryPatch, JournalEntry, Session, User};
