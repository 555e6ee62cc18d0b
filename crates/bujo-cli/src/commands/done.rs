use std::path::PathBuf;

use bujo_core::EntryId;

use crate::commands::common::{normalize_entry_identifier, open_journal, reconcile_and_report};
use crate::error::CliError;

pub async fn run_done(
    id: &str,
    api_url: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let normalized = normalize_entry_identifier(id)?;
    let entry_id: EntryId = normalized
        .parse()
        .map_err(|_| CliError::EmptyEntryId)?;

    let mut journal = open_journal(api_url, data_dir)?;
    let Some((entry, pending)) = journal.toggle_complete(&entry_id) else {
        return Err(CliError::EntryNotFound(normalized));
    };

    let state = if entry.is_completed() { "done" } else { "open" };
    println!("{} {state}", entry.id);
    reconcile_and_report(&mut journal, pending).await;
    Ok(())
}
