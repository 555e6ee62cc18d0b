//! Dashboard statistics: pure functions over the entry list.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{EntryKind, JournalEntry};

pub const RECENT_LIMIT: usize = 5;
pub const UPCOMING_LIMIT: usize = 3;

/// Per-kind totals plus completion counts.
///
/// `pending` counts tasks only; completion on other kinds is ignored there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub tasks: usize,
    pub notes: usize,
    pub events: usize,
    pub habits: usize,
    pub emotions: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Compute the dashboard counters in one pass.
#[must_use]
pub fn dashboard_stats(entries: &[JournalEntry]) -> DashboardStats {
    let mut stats = DashboardStats {
        total: entries.len(),
        ..DashboardStats::default()
    };
    for entry in entries {
        match entry.kind {
            EntryKind::Task => stats.tasks += 1,
            EntryKind::Note => stats.notes += 1,
            EntryKind::Event => stats.events += 1,
            EntryKind::Habit => stats.habits += 1,
            EntryKind::Emotion => stats.emotions += 1,
        }
        if entry.is_completed() {
            stats.completed += 1;
        }
        if entry.kind == EntryKind::Task && !entry.is_completed() {
            stats.pending += 1;
        }
    }
    stats
}

/// The most recently created entries, newest first.
#[must_use]
pub fn recent_entries(entries: &[JournalEntry], limit: usize) -> Vec<JournalEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Dated events on or after `today`, soonest first.
#[must_use]
pub fn upcoming_events(
    entries: &[JournalEntry],
    today: NaiveDate,
    limit: usize,
) -> Vec<JournalEntry> {
    let mut events: Vec<JournalEntry> = entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Event)
        .filter(|entry| entry.date.is_some_and(|date| date >= today))
        .cloned()
        .collect();
    events.sort_by_key(|entry| entry.date);
    events.truncate(limit);
    events
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use crate::models::{EntryDraft, EntryId};

    use super::*;

    fn entry(kind: EntryKind, title: &str) -> JournalEntry {
        JournalEntry::from_draft(EntryDraft::new(kind, title))
    }

    fn dated_event(title: &str, date: NaiveDate) -> JournalEntry {
        let mut event = entry(EntryKind::Event, title);
        event.date = Some(date);
        event
    }

    #[test]
    fn stats_count_kinds_completion_and_pending_tasks() {
        let mut done_task = entry(EntryKind::Task, "done");
        done_task.completed = Some(true);
        let entries = vec![
            done_task,
            entry(EntryKind::Task, "open"),
            entry(EntryKind::Note, "thought"),
            entry(EntryKind::Habit, "meditate"),
            entry(EntryKind::Emotion, "calm"),
        ];

        let stats = dashboard_stats(&entries);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.tasks, 2);
        assert_eq!(stats.notes, 1);
        assert_eq!(stats.habits, 1);
        assert_eq!(stats.emotions, 1);
        assert_eq!(stats.events, 0);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
    }

    #[test]
    fn stats_of_empty_list_are_zero() {
        assert_eq!(dashboard_stats(&[]), DashboardStats::default());
    }

    #[test]
    fn recent_entries_sorts_newest_first_and_truncates() {
        let mut entries: Vec<JournalEntry> = (0..7)
            .map(|i| {
                let mut e = entry(EntryKind::Note, &format!("note {i}"));
                e.id = format!("note{i}00").parse::<EntryId>().unwrap();
                e.created_at = Utc::now() - Duration::hours(i);
                e
            })
            .collect();
        entries.reverse();

        let recent = recent_entries(&entries, RECENT_LIMIT);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "note 0");
        assert_eq!(recent[4].title, "note 4");
    }

    #[test]
    fn upcoming_events_filters_and_sorts_by_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let entries = vec![
            dated_event("past", today - Duration::days(1)),
            dated_event("soon", today + Duration::days(2)),
            dated_event("today", today),
            dated_event("later", today + Duration::days(10)),
            dated_event("much later", today + Duration::days(30)),
            entry(EntryKind::Event, "undated"),
            entry(EntryKind::Task, "not an event"),
        ];

        let upcoming = upcoming_events(&entries, today, UPCOMING_LIMIT);
        let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["today", "soon", "later"]);
    }
}
