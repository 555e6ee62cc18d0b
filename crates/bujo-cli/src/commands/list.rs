use std::path::PathBuf;

use bujo_core::{EntryKind, JournalEntry};

use crate::commands::common::{entry_to_list_item, format_entry_lines, open_journal, EntryListItem};
use crate::error::CliError;

pub struct ListArgs {
    pub limit: usize,
    pub kind: Option<EntryKind>,
    pub json: bool,
    pub local: bool,
}

pub async fn run_list(
    args: ListArgs,
    api_url: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut journal = open_journal(api_url, data_dir)?;
    let entries = if args.local {
        journal.list_local()
    } else {
        journal.list().await
    };

    let mut filtered: Vec<JournalEntry> = entries
        .into_iter()
        .filter(|entry| args.kind.is_none_or(|kind| entry.kind == kind))
        .collect();
    filtered.truncate(args.limit);

    if args.json {
        let items = filtered
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_entry_lines(&filtered) {
            println!("{line}");
        }
    }

    Ok(())
}
