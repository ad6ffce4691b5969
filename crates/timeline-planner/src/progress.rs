//! Subtask-driven completion progress.

use crate::models::Task;

/// Qualitative progress bucket used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBucket {
    Empty,
    Partial,
    Full,
}

impl ProgressBucket {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Partial => "Partial",
            Self::Full => "Full",
        }
    }
}

/// Completion percentage, 0-100, rounded half-up.
///
/// A task without subtasks reports 0: progress is purely subtask-driven.
pub fn progress(task: &Task) -> u32 {
    percent(task.completed_count(), task.subtasks.len())
}

/// `round(100 * done / total)` in integer arithmetic.
pub fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((200 * done + total) / (2 * total)) as u32
}

pub fn progress_bucket(progress: u32) -> ProgressBucket {
    match progress {
        0 => ProgressBucket::Empty,
        p if p >= 100 => ProgressBucket::Full,
        _ => ProgressBucket::Partial,
    }
}
