//! Week-granular timeline planning engine.
//!
//! Tasks and milestones are placed on a calendar of 4- and 5-week months and
//! resolved to linear week positions for a Gantt-style layout. Subtask
//! completion rolls up into task progress, a work/break interval timer
//! credits focus sessions to subtasks, and the session log is summarised
//! per week, month or all time.
//!
//! # Features
//!
//! - **Calendar**: month buckets over a configurable window, week positions
//! - **Spans**: task start/duration and milestone hit-testing
//! - **Progress**: rounded completion percentage and status buckets
//! - **Interval timer**: work, break and long-break phases with session records
//! - **Analytics**: per-subtask hours for the current week, month or all time
//! - **Persistence**: JSON records in SQLite behind a key-value trait
//!
//! [`Planner`] is the entry point for applications; the modules below it are
//! pure and usable on their own.

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod daily;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod progress;
pub mod pulse;
pub mod span;
pub mod store;
pub mod timer;

// Re-exports
pub use analytics::{SubtaskTotal, Window};
pub use calendar::{build_calendar, week_position, Calendar, CalendarBucket, WeekSlot};
pub use config::{CalendarConfig, Config, LoggingConfig, TimerConfig};
pub use dashboard::{DashboardSummary, DueWarning, TaskStatus, TaskStatusRow};
pub use error::{PlannerError, PlannerResult};
pub use logging::init_logging;
pub use models::{
    DailyEntry, DailyTaskLog, FocusTarget, Milestone, Priority, SessionLog, SessionRecord,
    Subtask, Task, WeekCoord,
};
pub use planner::{Planner, TaskEdit};
pub use progress::{progress, progress_bucket, ProgressBucket};
pub use pulse::{run_pulse, TimerCommand, TimerEvent};
pub use span::{milestone_at, task_span, TaskSpan};
pub use store::{Database, KeyValueStore, MemoryStore};
pub use timer::{IntervalTimer, Phase, StartRejected, TickOutcome};
