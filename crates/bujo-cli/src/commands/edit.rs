use std::path::PathBuf;

use bujo_core::{EntryId, EntryKind, EntryPatch};

use crate::commands::common::{
    normalize_entry_identifier, open_journal, parse_entry_date, reconcile_and_report,
};
use crate::error::CliError;

pub struct EditArgs {
    pub id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub kind: Option<EntryKind>,
    pub date: Option<String>,
    pub tags: Vec<String>,
}

pub async fn run_edit(
    args: EditArgs,
    api_url: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let normalized = normalize_entry_identifier(&args.id)?;
    let entry_id: EntryId = normalized
        .parse()
        .map_err(|_| CliError::EmptyEntryId)?;
    let patch = build_patch(&args)?;

    let mut journal = open_journal(api_url, data_dir)?;
    let Some((entry, pending)) = journal.update(&entry_id, patch) else {
        return Err(CliError::EntryNotFound(normalized));
    };

    println!("{}", entry.id);
    reconcile_and_report(&mut journal, pending).await;
    Ok(())
}

fn build_patch(args: &EditArgs) -> Result<EntryPatch, CliError> {
    let patch = EntryPatch {
        kind: args.kind,
        title: args
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(ToString::to_string),
        notes: args.notes.clone(),
        completed: None,
        date: args.date.as_deref().map(parse_entry_date).transpose()?,
        tags: (!args.tags.is_empty()).then(|| args.tags.clone()),
    };

    if patch == EntryPatch::default() {
        return Err(CliError::EmptyEdit);
    }
    Ok(patch)
}
