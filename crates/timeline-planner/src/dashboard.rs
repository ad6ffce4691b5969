//! Weekly dashboard: status and due-date warnings per task.

use crate::models::{Task, TaskId};
use crate::progress::{progress, progress_bucket, ProgressBucket};
use chrono::{Duration, NaiveDate};

/// Days ahead of the due date at which a task is flagged.
pub const DUE_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl TaskStatus {
    pub fn from_progress(progress: u32) -> Self {
        match progress_bucket(progress) {
            ProgressBucket::Empty => Self::NotStarted,
            ProgressBucket::Partial => Self::InProgress,
            ProgressBucket::Full => Self::Complete,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueWarning {
    Overdue,
    DueSoon,
}

/// One dashboard line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusRow {
    pub task_id: TaskId,
    pub name: String,
    pub progress: u32,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub days_until_due: Option<i64>,
    pub warning: Option<DueWarning>,
}

/// Completed, pending and overdue counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

/// Day `end_week * 7` of the end month, rolling into the next month for
/// week 5. `None` if the end coordinate is not a real month.
pub fn due_date(task: &Task) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(task.end_year, task.end_month, 1)?;
    let offset = i64::from(task.end_week) * 7 - 1;
    first.checked_add_signed(Duration::days(offset))
}

pub fn due_warning(status: TaskStatus, days_until_due: i64) -> Option<DueWarning> {
    if status == TaskStatus::Complete {
        return None;
    }
    if days_until_due < 0 {
        Some(DueWarning::Overdue)
    } else if days_until_due <= DUE_SOON_DAYS {
        Some(DueWarning::DueSoon)
    } else {
        None
    }
}

pub fn task_status(task: &Task, today: NaiveDate) -> TaskStatusRow {
    let progress = progress(task);
    let status = TaskStatus::from_progress(progress);
    let due_date = due_date(task);
    let days_until_due = due_date.map(|due| (due - today).num_days());

    TaskStatusRow {
        task_id: task.id,
        name: task.name.clone(),
        progress,
        status,
        due_date,
        days_until_due,
        warning: days_until_due.and_then(|days| due_warning(status, days)),
    }
}

/// Status rows in task-list order.
pub fn task_statuses(tasks: &[Task], today: NaiveDate) -> Vec<TaskStatusRow> {
    tasks.iter().map(|task| task_status(task, today)).collect()
}

pub fn summarize(rows: &[TaskStatusRow]) -> DashboardSummary {
    let completed = rows.iter().filter(|r| r.status == TaskStatus::Complete).count();
    DashboardSummary {
        completed,
        pending: rows.len() - completed,
        overdue: rows
            .iter()
            .filter(|r| r.warning == Some(DueWarning::Overdue))
            .count(),
    }
}
