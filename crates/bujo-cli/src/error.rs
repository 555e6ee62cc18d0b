use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] bujo_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No entry title provided")]
    EmptyTitle,
    #[error("Entry ID cannot be empty")]
    EmptyEntryId,
    #[error("Entry not found for id: {0}")]
    EntryNotFound(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Nothing to edit; pass at least one of --title/--notes/--kind/--date/--tag")]
    EmptyEdit,
    #[error("Only JPG, PNG, HEIC images are supported")]
    UnsupportedImageType,
    #[error("Image must be below 5MB")]
    ImageTooLarge,
    #[error("Not logged in. Run `bujo auth login` first.")]
    NotLoggedIn,
}
