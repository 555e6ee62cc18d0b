use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use bujo_core::stats::{
    dashboard_stats, recent_entries, upcoming_events, DashboardStats, RECENT_LIMIT, UPCOMING_LIMIT,
};

use crate::commands::common::{entry_to_list_item, open_journal, title_preview, EntryListItem};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct StatsReport {
    stats: DashboardStats,
    recent: Vec<EntryListItem>,
    upcoming_events: Vec<EntryListItem>,
}

pub async fn run_stats(
    as_json: bool,
    api_url: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut journal = open_journal(api_url, data_dir)?;
    let entries = journal.list().await;

    let today = Utc::now().date_naive();
    let stats = dashboard_stats(&entries);
    let recent = recent_entries(&entries, RECENT_LIMIT);
    let upcoming = upcoming_events(&entries, today, UPCOMING_LIMIT);

    if as_json {
        let report = StatsReport {
            stats,
            recent: recent.iter().map(entry_to_list_item).collect(),
            upcoming_events: upcoming.iter().map(entry_to_list_item).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Entries: {} total", stats.total);
    println!(
        "  tasks {}  notes {}  events {}  habits {}  emotions {}",
        stats.tasks, stats.notes, stats.events, stats.habits, stats.emotions
    );
    println!(
        "  completed {}  pending tasks {}",
        stats.completed, stats.pending
    );

    if !recent.is_empty() {
        println!("\nRecent:");
        for entry in &recent {
            println!("  {}  {}", entry.id, title_preview(&entry.title, 50));
        }
    }

    if !upcoming.is_empty() {
        println!("\nUpcoming events:");
        for event in &upcoming {
            let date = event.date.map_or_else(String::new, |date| date.to_string());
            println!("  {date}  {}", title_preview(&event.title, 50));
        }
    }

    Ok(())
}
