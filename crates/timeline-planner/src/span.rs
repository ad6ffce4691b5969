//! Task spans and milestone placement on the week grid.

use crate::calendar::Calendar;
use crate::models::{Milestone, Task};

/// Occupied range of week positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpan {
    pub start: i64,
    /// Number of weeks. Non-positive when the end precedes the start.
    pub duration: i64,
}

impl TaskSpan {
    /// Whether anything should be drawn for this span.
    pub fn is_visible(&self) -> bool {
        self.duration > 0
    }

    pub fn covers(&self, position: i64) -> bool {
        position >= self.start && position < self.start + self.duration
    }

    /// Last covered position, if any.
    pub fn last(&self) -> Option<i64> {
        self.is_visible().then(|| self.start + self.duration - 1)
    }
}

/// Resolve a task's start position and duration in weeks.
///
/// Malformed tasks (end before start) are not rejected; they come back with
/// a non-positive duration.
pub fn task_span(task: &Task, calendar: &Calendar) -> TaskSpan {
    let start = calendar.week_position(task.start());
    let end = calendar.week_position(task.end());
    TaskSpan {
        start,
        duration: end - start + 1,
    }
}

pub fn milestone_position(milestone: &Milestone, calendar: &Calendar) -> i64 {
    calendar.week_position(milestone.coord())
}

/// First milestone, in list order, sitting on `position`.
pub fn milestone_at<'a>(
    milestones: &'a [Milestone],
    calendar: &Calendar,
    position: i64,
) -> Option<&'a Milestone> {
    milestones
        .iter()
        .find(|m| milestone_position(m, calendar) == position)
}

/// Milestones that fall inside a task's span, in list order.
pub fn milestones_within<'a>(
    milestones: &'a [Milestone],
    calendar: &Calendar,
    span: TaskSpan,
) -> Vec<&'a Milestone> {
    milestones
        .iter()
        .filter(|m| span.covers(milestone_position(m, calendar)))
        .collect()
}
