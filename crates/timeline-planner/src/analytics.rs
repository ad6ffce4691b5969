//! Focus-time totals over calendar windows.
//!
//! Weeks start on Sunday.

use crate::models::{SessionLog, SubtaskId, Task, TaskId};
use chrono::{Datelike, Duration, NaiveDate};

/// Aggregation window relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// From the most recent Sunday onward.
    Week,
    /// Same calendar month and year.
    Month,
    All,
}

/// Most recent Sunday on or before `today`.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

pub fn in_window(date: NaiveDate, window: Window, today: NaiveDate) -> bool {
    match window {
        Window::Week => date >= week_start(today),
        Window::Month => date.year() == today.year() && date.month() == today.month(),
        Window::All => true,
    }
}

/// Raw minutes credited to a subtask within `window`.
pub fn total_minutes(
    log: &SessionLog,
    task_id: TaskId,
    subtask_id: SubtaskId,
    window: Window,
    today: NaiveDate,
) -> u64 {
    log.iter()
        .filter(|(date, _)| in_window(**date, window, today))
        .flat_map(|(_, records)| records)
        .filter(|r| r.is_for(task_id, subtask_id))
        .map(|r| u64::from(r.duration_minutes))
        .sum()
}

/// Hours credited to a subtask within `window`, rounded to one decimal.
pub fn total_hours(
    log: &SessionLog,
    task_id: TaskId,
    subtask_id: SubtaskId,
    window: Window,
    today: NaiveDate,
) -> f64 {
    round_tenths(total_minutes(log, task_id, subtask_id, window, today) as f64 / 60.0)
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-subtask focus hours for the current week and month.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtaskTotal {
    pub task_id: TaskId,
    pub subtask_id: SubtaskId,
    pub task_name: String,
    pub subtask_name: String,
    pub week_hours: f64,
    pub month_hours: f64,
}

/// Week and month totals for every subtask with any activity.
///
/// Subtasks whose rounded totals are zero in both windows are left out.
pub fn subtask_totals(tasks: &[Task], log: &SessionLog, today: NaiveDate) -> Vec<SubtaskTotal> {
    tasks
        .iter()
        .flat_map(|task| task.subtasks.iter().map(move |subtask| (task, subtask)))
        .filter_map(|(task, subtask)| {
            let week_hours = total_hours(log, task.id, subtask.id, Window::Week, today);
            let month_hours = total_hours(log, task.id, subtask.id, Window::Month, today);
            if week_hours == 0.0 && month_hours == 0.0 {
                return None;
            }
            Some(SubtaskTotal {
                task_id: task.id,
                subtask_id: subtask.id,
                task_name: task.name.clone(),
                subtask_name: subtask.name.clone(),
                week_hours,
                month_hours,
            })
        })
        .collect()
}
