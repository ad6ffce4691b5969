//! Data models for timeline planning.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type TaskId = Uuid;
pub type SubtaskId = Uuid;
pub type MilestoneId = Uuid;
pub type EntryId = Uuid;

/// Color tags handed out to new tasks, in rotation.
pub const COLOR_TAGS: [&str; 6] = ["blue", "purple", "green", "yellow", "orange", "red"];

/// A (month, week-of-month, year) coordinate on the planning calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekCoord {
    /// Month number, 1-12.
    pub month: u32,
    /// Week of month, 1-5.
    pub week: u32,
    pub year: i32,
}

impl WeekCoord {
    pub fn new(month: u32, week: u32, year: i32) -> Self {
        Self { month, week, year }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// A checklist item owned by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub name: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            completed: false,
        }
    }
}

/// A task laid out on the timeline between two week coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start_month: u32,
    pub start_week: u32,
    pub start_year: i32,
    pub end_month: u32,
    pub end_week: u32,
    pub end_year: i32,
    pub color: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(name: impl Into<String>, start: WeekCoord, end: WeekCoord) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_month: start.month,
            start_week: start.week,
            start_year: start.year,
            end_month: end.month,
            end_week: end.week,
            end_year: end.year,
            color: COLOR_TAGS[0].to_string(),
            priority: Priority::default(),
            expanded: false,
            subtasks: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_subtask(mut self, subtask: Subtask) -> Self {
        self.subtasks.push(subtask);
        self
    }

    pub fn start(&self) -> WeekCoord {
        WeekCoord::new(self.start_month, self.start_week, self.start_year)
    }

    pub fn end(&self) -> WeekCoord {
        WeekCoord::new(self.end_month, self.end_week, self.end_year)
    }

    pub fn set_start(&mut self, coord: WeekCoord) {
        self.start_month = coord.month;
        self.start_week = coord.week;
        self.start_year = coord.year;
    }

    pub fn set_end(&mut self, coord: WeekCoord) {
        self.end_month = coord.month;
        self.end_week = coord.week;
        self.end_year = coord.year;
    }

    pub fn subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }

    pub fn subtask_mut(&mut self, id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == id)
    }

    /// Number of completed subtasks.
    pub fn completed_count(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }
}

/// A point-in-time marker on the timeline, independent of any task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub name: String,
    pub month: u32,
    pub week: u32,
    pub year: i32,
}

impl Milestone {
    pub fn new(name: impl Into<String>, at: WeekCoord) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            month: at.month,
            week: at.week,
            year: at.year,
        }
    }

    pub fn coord(&self) -> WeekCoord {
        WeekCoord::new(self.month, self.week, self.year)
    }
}

/// A to-do line in the per-day log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub id: EntryId,
    pub text: String,
    pub completed: bool,
}

impl DailyEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
        }
    }
}

/// Daily to-do lines bucketed by calendar date.
pub type DailyTaskLog = BTreeMap<NaiveDate, Vec<DailyEntry>>;

/// The (task, subtask) pair a work interval is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTarget {
    pub task_id: TaskId,
    pub subtask_id: SubtaskId,
}

impl FocusTarget {
    pub fn new(task_id: TaskId, subtask_id: SubtaskId) -> Self {
        Self { task_id, subtask_id }
    }
}

/// One completed work interval. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub task_id: TaskId,
    pub subtask_id: SubtaskId,
    pub duration_minutes: u32,
    pub timestamp: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(target: FocusTarget, duration_minutes: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            task_id: target.task_id,
            subtask_id: target.subtask_id,
            duration_minutes,
            timestamp,
        }
    }

    pub fn is_for(&self, task_id: TaskId, subtask_id: SubtaskId) -> bool {
        self.task_id == task_id && self.subtask_id == subtask_id
    }
}

/// Completed work intervals bucketed by local calendar date.
pub type SessionLog = BTreeMap<NaiveDate, Vec<SessionRecord>>;
