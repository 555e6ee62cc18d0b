use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use bujo_core::api::ApiClient;
use bujo_core::journal::{HttpRemoteJournal, Journal, ReconcileOutcome, Reconciliation};
use bujo_core::session::SessionManager;
use bujo_core::{ApiConfig, JournalEntry};

use crate::error::CliError;
use crate::mirror::FileMirror;
use crate::session_store::KeyringSessionStore;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";

pub type CliJournal = Journal<FileMirror, HttpRemoteJournal<KeyringSessionStore>>;

pub fn api_config(api_url: Option<&str>) -> Result<ApiConfig, CliError> {
    let url = api_url
        .map(ToString::to_string)
        .or_else(|| env::var("BUJO_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    Ok(ApiConfig::new(&url)?)
}

pub fn session_manager(
    api_url: Option<&str>,
) -> Result<SessionManager<KeyringSessionStore>, CliError> {
    Ok(SessionManager::new(
        api_config(api_url)?,
        KeyringSessionStore::new(),
    )?)
}

pub fn api_client(api_url: Option<&str>) -> Result<ApiClient<KeyringSessionStore>, CliError> {
    let config = api_config(api_url)?;
    let session = SessionManager::new(config.clone(), KeyringSessionStore::new())?;
    Ok(ApiClient::new(config, session)?)
}

pub fn open_journal(
    api_url: Option<&str>,
    data_dir: Option<PathBuf>,
) -> Result<CliJournal, CliError> {
    let mirror = FileMirror::new(mirror_path(data_dir));
    let remote = HttpRemoteJournal::new(api_client(api_url)?);
    Ok(Journal::new(mirror, remote))
}

pub fn mirror_path(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir
        .or_else(|| env::var_os("BUJO_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("bujo")
        })
        .join("entries.json")
}

/// Push a pending reconciliation and describe what happened to the user.
pub async fn reconcile_and_report(journal: &mut CliJournal, pending: Option<Reconciliation>) {
    let Some(pending) = pending else {
        println!("(offline, saved locally)");
        return;
    };
    match journal.reconcile(pending).await {
        ReconcileOutcome::Synced(_) | ReconcileOutcome::Deleted => {}
        ReconcileOutcome::KeptLocal => println!("(sync failed, kept locally)"),
        ReconcileOutcome::Stale => {}
    }
}

pub fn normalize_title(title_parts: &[String]) -> Result<String, CliError> {
    let joined = title_parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_entry_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyEntryId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_entry_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub completed: Option<bool>,
    pub date: Option<String>,
    pub created_at: String,
    pub relative_time: String,
    pub tags: Vec<String>,
}

pub fn entry_to_list_item(entry: &JournalEntry) -> EntryListItem {
    let now_ms = Utc::now().timestamp_millis();
    let touched = entry.updated_at.unwrap_or(entry.created_at);

    EntryListItem {
        id: entry.id.to_string(),
        kind: entry.kind.to_string(),
        title: entry.title.clone(),
        completed: entry.completed,
        date: entry.date.map(|date| date.to_string()),
        created_at: entry.created_at.to_rfc3339(),
        relative_time: format_relative_time(touched.timestamp_millis(), now_ms),
        tags: entry.tags.clone().unwrap_or_default(),
    }
}

pub fn format_entry_lines(entries: &[JournalEntry]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    entries
        .iter()
        .map(|entry| {
            let id = entry.id.to_string();
            let kind = entry.kind.as_str();
            let marker = completion_marker(entry);
            let title = title_preview(&entry.title, 40);
            let touched = entry.updated_at.unwrap_or(entry.created_at);
            let relative_time = format_relative_time(touched.timestamp_millis(), now_ms);
            let tags = render_tags(entry);

            if tags.is_empty() {
                format!("{id:<8}  {kind:<7}  {marker} {title:<40}  {relative_time}")
            } else {
                format!("{id:<8}  {kind:<7}  {marker} {title:<40}  {relative_time:<10}  {tags}")
            }
        })
        .collect()
}

fn completion_marker(entry: &JournalEntry) -> &'static str {
    match entry.completed {
        Some(true) => "[x]",
        Some(false) => "[ ]",
        None => "   ",
    }
}

pub fn title_preview(title: &str, max_chars: usize) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn render_tags(entry: &JournalEntry) -> String {
    let mut tags = entry.tags.clone().unwrap_or_default();
    tags.sort();
    tags.into_iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

#[cfg(test)]
mod tests {
    use bujo_core::{EntryDraft, EntryKind};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_title_trims_and_rejects_empty() {
        assert_eq!(
            normalize_title(&["  Buy".to_string(), "milk ".to_string()]).unwrap(),
            "Buy milk"
        );
        assert!(matches!(
            normalize_title(&[" ".to_string()]),
            Err(CliError::EmptyTitle)
        ));
    }

    #[test]
    fn normalize_entry_identifier_rejects_empty() {
        assert!(matches!(
            normalize_entry_identifier(" \n "),
            Err(CliError::EmptyEntryId)
        ));
        assert_eq!(normalize_entry_identifier("  abc123  ").unwrap(), "abc123");
    }

    #[test]
    fn parse_entry_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_entry_date("2026-03-14").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
        );
        assert!(matches!(
            parse_entry_date("14/03/2026"),
            Err(CliError::InvalidDate(_))
        ));
    }

    #[test]
    fn format_relative_time_units() {
        let now = 10_000_000;
        assert_eq!(format_relative_time(now - 30_000, now), "just now");
        assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
        assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    }

    #[test]
    fn title_preview_truncates_with_ellipsis() {
        let preview = title_preview("This is a very long sentence that should be shortened", 20);
        assert_eq!(preview, "This is a very lo...");
    }

    #[test]
    fn entry_lines_show_completion_marker_and_tags() {
        let mut entry = bujo_core::JournalEntry::from_draft(EntryDraft::new(
            EntryKind::Task,
            "Buy milk",
        ));
        entry.tags = Some(vec!["errand".to_string()]);

        let lines = format_entry_lines(&[entry]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[ ] Buy milk"));
        assert!(lines[0].contains("#errand"));
        assert!(lines[0].contains("task"));
    }

    #[test]
    fn mirror_path_prefers_explicit_directory() {
        let path = mirror_path(Some(PathBuf::from("/tmp/bujo-test")));
        assert_eq!(path, PathBuf::from("/tmp/bujo-test/entries.json"));
    }
}
