//! Per-day to-do log.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{DailyEntry, DailyTaskLog, EntryId};
use chrono::NaiveDate;

/// Append an entry under `date` and return its id.
pub fn add_entry(log: &mut DailyTaskLog, date: NaiveDate, text: &str) -> PlannerResult<EntryId> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlannerError::Validation("entry text is empty".to_string()));
    }
    let entry = DailyEntry::new(text);
    let id = entry.id;
    log.entry(date).or_default().push(entry);
    Ok(id)
}

/// Flip completion and return the new state.
pub fn toggle_entry(log: &mut DailyTaskLog, date: NaiveDate, id: EntryId) -> PlannerResult<bool> {
    let entry = log
        .get_mut(&date)
        .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
        .ok_or_else(|| PlannerError::NotFound(format!("daily entry {id} on {date}")))?;
    entry.completed = !entry.completed;
    Ok(entry.completed)
}

/// Remove an entry. A date left with no entries is dropped from the log.
pub fn delete_entry(log: &mut DailyTaskLog, date: NaiveDate, id: EntryId) -> PlannerResult<()> {
    let entries = log
        .get_mut(&date)
        .ok_or_else(|| PlannerError::NotFound(format!("daily entries on {date}")))?;
    let before = entries.len();
    entries.retain(|e| e.id != id);
    if entries.len() == before {
        return Err(PlannerError::NotFound(format!("daily entry {id} on {date}")));
    }
    if entries.is_empty() {
        log.remove(&date);
    }
    Ok(())
}

pub fn entries_for(log: &DailyTaskLog, date: NaiveDate) -> &[DailyEntry] {
    log.get(&date).map(Vec::as_slice).unwrap_or(&[])
}

/// (completed, total) for a date.
pub fn completion(log: &DailyTaskLog, date: NaiveDate) -> (usize, usize) {
    let entries = entries_for(log, date);
    (entries.iter().filter(|e| e.completed).count(), entries.len())
}
