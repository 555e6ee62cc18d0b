use std::path::PathBuf;

use bujo_core::EntryId;

use crate::commands::common::{normalize_entry_identifier, open_journal, reconcile_and_report};
use crate::error::CliError;

pub async fn run_delete(
    id: &str,
    api_url: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let normalized = normalize_entry_identifier(id)?;
    let entry_id: EntryId = normalized
        .parse()
        .map_err(|_| CliError::EmptyEntryId)?;

    let mut journal = open_journal(api_url, data_dir)?;
    let (removed, pending) = journal.remove(&entry_id);
    if !removed {
        return Err(CliError::EntryNotFound(normalized));
    }

    println!("{entry_id}");
    reconcile_and_report(&mut journal, pending).await;
    Ok(())
}
