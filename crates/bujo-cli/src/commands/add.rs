use std::path::PathBuf;

use bujo_core::journal::ReconcileOutcome;
use bujo_core::{EntryDraft, EntryKind};

use crate::commands::common::{normalize_title, open_journal, parse_entry_date};
use crate::error::CliError;

pub struct AddArgs {
    pub title: Vec<String>,
    pub kind: EntryKind,
    pub notes: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
}

pub async fn run_add(
    args: AddArgs,
    api_url: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let title = normalize_title(&args.title)?;
    let date = args.date.as_deref().map(parse_entry_date).transpose()?;

    let mut draft = EntryDraft::new(args.kind, title);
    draft.notes = args.notes.map(|notes| notes.trim().to_string());
    draft.date = date;
    if !args.tags.is_empty() {
        draft.tags = Some(args.tags);
    }

    let mut journal = open_journal(api_url, data_dir)?;
    let (entry, pending) = journal.add(draft);

    // Prefer the server-assigned id when the create syncs right away.
    match pending {
        Some(pending) => match journal.reconcile(pending).await {
            ReconcileOutcome::Synced(server) => println!("{}", server.id),
            _ => {
                println!("{}", entry.id);
                println!("(sync failed, kept locally)");
            }
        },
        None => println!("{}", entry.id),
    }
    Ok(())
}
