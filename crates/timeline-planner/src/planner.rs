//! Planner state and operations.
//!
//! [`Planner`] is the single owner of every collection and of the interval
//! timer. Each mutation writes the affected record back to the store before
//! returning.

use crate::analytics::{self, SubtaskTotal, Window};
use crate::calendar::{weeks_in_month, Calendar};
use crate::config::{Config, TimerConfig};
use crate::daily;
use crate::dashboard::{self, DashboardSummary, TaskStatusRow};
use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    DailyEntry, DailyTaskLog, EntryId, FocusTarget, Milestone, MilestoneId, Priority, SessionLog,
    Subtask, SubtaskId, Task, TaskId, WeekCoord, COLOR_TAGS,
};
use crate::progress;
use crate::span::{self, TaskSpan};
use crate::store::{
    self, Database, KeyValueStore, DAILY_TASKS_KEY, MILESTONES_KEY, SESSIONS_KEY, TASKS_KEY,
};
use crate::timer::{IntervalTimer, StartRejected, TickOutcome};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Field changes for [`Planner::update_task`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub start: Option<WeekCoord>,
    pub end: Option<WeekCoord>,
    pub priority: Option<Priority>,
    pub color: Option<String>,
}

pub struct Planner<S: KeyValueStore = Database> {
    store: S,
    config: Config,
    calendar: Calendar,
    tasks: Vec<Task>,
    milestones: Vec<Milestone>,
    daily: DailyTaskLog,
    sessions: SessionLog,
    timer: IntervalTimer,
}

impl Planner<Database> {
    /// Open the planner with the user's config and on-disk database.
    pub fn open_default() -> PlannerResult<Self> {
        let config = Config::load();
        let db_path = Config::db_path().unwrap_or_else(|| "planner.db".into());
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(&db_path)?;
        Self::with_store(db, config)
    }
}

impl<S: KeyValueStore> Planner<S> {
    /// Load all records from `store`.
    pub fn with_store(store: S, config: Config) -> PlannerResult<Self> {
        let data = store::load_data(&store, &config.calendar)?;
        let timer = IntervalTimer::new(timer_config(data.timer_config, &config));
        let calendar = build_window(&config);

        tracing::info!(
            tasks = data.tasks.len(),
            milestones = data.milestones.len(),
            session_days = data.sessions.len(),
            "planner loaded"
        );

        Ok(Self {
            store,
            config,
            calendar,
            tasks: data.tasks,
            milestones: data.milestones,
            daily: data.daily,
            sessions: data.sessions,
            timer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn daily_log(&self) -> &DailyTaskLog {
        &self.daily
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // Task operations

    pub fn add_task(
        &mut self,
        name: &str,
        start: WeekCoord,
        end: WeekCoord,
        priority: Priority,
    ) -> PlannerResult<TaskId> {
        let name = require_name(name)?;
        validate_coord(start)?;
        validate_coord(end)?;

        let color = COLOR_TAGS[self.tasks.len() % COLOR_TAGS.len()];
        let task = Task::new(name, start, end)
            .with_priority(priority)
            .with_color(color);
        let id = task.id;
        self.tasks.push(task);
        self.persist_tasks()?;
        tracing::info!(task = %id, "task added");
        Ok(id)
    }

    pub fn update_task(&mut self, id: TaskId, edit: TaskEdit) -> PlannerResult<()> {
        let name = edit.name.as_deref().map(require_name).transpose()?;
        if let Some(coord) = edit.start {
            validate_coord(coord)?;
        }
        if let Some(coord) = edit.end {
            validate_coord(coord)?;
        }

        let task = self.task_mut(id)?;
        if let Some(name) = name {
            task.name = name.to_string();
        }
        if let Some(coord) = edit.start {
            task.set_start(coord);
        }
        if let Some(coord) = edit.end {
            task.set_end(coord);
        }
        if let Some(priority) = edit.priority {
            task.priority = priority;
        }
        if let Some(color) = edit.color {
            task.color = color;
        }
        self.persist_tasks()
    }

    /// Delete a task and its subtasks. Recorded sessions are kept.
    pub fn delete_task(&mut self, id: TaskId) -> PlannerResult<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(not_found_task(id));
        }
        if self.timer.focus().is_some_and(|f| f.task_id == id) {
            self.timer.set_focus(None);
        }
        self.persist_tasks()?;
        tracing::info!(task = %id, "task deleted");
        Ok(())
    }

    pub fn toggle_expanded(&mut self, id: TaskId) -> PlannerResult<bool> {
        let task = self.task_mut(id)?;
        task.expanded = !task.expanded;
        let expanded = task.expanded;
        self.persist_tasks()?;
        Ok(expanded)
    }

    /// Swap the task at `index` with its predecessor. No-op at the top.
    pub fn move_task_up(&mut self, index: usize) -> PlannerResult<bool> {
        if index == 0 || index >= self.tasks.len() {
            return Ok(false);
        }
        self.tasks.swap(index, index - 1);
        self.persist_tasks()?;
        Ok(true)
    }

    /// Swap the task at `index` with its successor. No-op at the bottom.
    pub fn move_task_down(&mut self, index: usize) -> PlannerResult<bool> {
        if index + 1 >= self.tasks.len() {
            return Ok(false);
        }
        self.tasks.swap(index, index + 1);
        self.persist_tasks()?;
        Ok(true)
    }

    // Subtask operations

    pub fn add_subtask(&mut self, task_id: TaskId, name: &str) -> PlannerResult<SubtaskId> {
        let name = require_name(name)?;
        let subtask = Subtask::new(name);
        let id = subtask.id;
        self.task_mut(task_id)?.subtasks.push(subtask);
        self.persist_tasks()?;
        Ok(id)
    }

    pub fn toggle_subtask(
        &mut self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> PlannerResult<bool> {
        let subtask = self
            .task_mut(task_id)?
            .subtask_mut(subtask_id)
            .ok_or_else(|| not_found_subtask(subtask_id))?;
        subtask.completed = !subtask.completed;
        let completed = subtask.completed;
        self.persist_tasks()?;
        Ok(completed)
    }

    pub fn delete_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> PlannerResult<()> {
        let task = self.task_mut(task_id)?;
        let before = task.subtasks.len();
        task.subtasks.retain(|s| s.id != subtask_id);
        if task.subtasks.len() == before {
            return Err(not_found_subtask(subtask_id));
        }
        if self.timer.focus() == Some(FocusTarget::new(task_id, subtask_id)) {
            self.timer.set_focus(None);
        }
        self.persist_tasks()
    }

    // Milestone operations

    pub fn add_milestone(&mut self, name: &str, at: WeekCoord) -> PlannerResult<MilestoneId> {
        let name = require_name(name)?;
        validate_coord(at)?;
        let milestone = Milestone::new(name, at);
        let id = milestone.id;
        self.milestones.push(milestone);
        self.persist_milestones()?;
        Ok(id)
    }

    pub fn delete_milestone(&mut self, id: MilestoneId) -> PlannerResult<()> {
        let before = self.milestones.len();
        self.milestones.retain(|m| m.id != id);
        if self.milestones.len() == before {
            return Err(PlannerError::NotFound(format!("milestone {id}")));
        }
        self.persist_milestones()
    }

    // Daily log operations

    pub fn add_daily_entry(&mut self, date: NaiveDate, text: &str) -> PlannerResult<EntryId> {
        let id = daily::add_entry(&mut self.daily, date, text)?;
        self.persist_daily()?;
        Ok(id)
    }

    pub fn toggle_daily_entry(&mut self, date: NaiveDate, id: EntryId) -> PlannerResult<bool> {
        let completed = daily::toggle_entry(&mut self.daily, date, id)?;
        self.persist_daily()?;
        Ok(completed)
    }

    pub fn delete_daily_entry(&mut self, date: NaiveDate, id: EntryId) -> PlannerResult<()> {
        daily::delete_entry(&mut self.daily, date, id)?;
        self.persist_daily()
    }

    pub fn daily_entries(&self, date: NaiveDate) -> &[DailyEntry] {
        daily::entries_for(&self.daily, date)
    }

    /// (completed, total) entries for `date`.
    pub fn daily_completion(&self, date: NaiveDate) -> (usize, usize) {
        daily::completion(&self.daily, date)
    }

    // Timeline queries

    /// Replace the planning window. An inverted window leaves the calendar
    /// empty, so every coordinate resolves to position 0.
    pub fn set_calendar_window(
        &mut self,
        start_month: u32,
        start_year: i32,
        end_month: u32,
        end_year: i32,
    ) {
        self.config.calendar.start_month = start_month;
        self.config.calendar.start_year = start_year;
        self.config.calendar.end_month = end_month;
        self.config.calendar.end_year = end_year;
        self.calendar = build_window(&self.config);
    }

    pub fn task_span(&self, id: TaskId) -> Option<TaskSpan> {
        self.task(id).map(|task| span::task_span(task, &self.calendar))
    }

    /// Spans of all tasks, in list order.
    pub fn spans(&self) -> Vec<(TaskId, TaskSpan)> {
        self.tasks
            .iter()
            .map(|task| (task.id, span::task_span(task, &self.calendar)))
            .collect()
    }

    pub fn milestone_at(&self, position: i64) -> Option<&Milestone> {
        span::milestone_at(&self.milestones, &self.calendar, position)
    }

    /// Week position containing `today`, if it lies in the window.
    pub fn current_week(&self, today: NaiveDate) -> Option<i64> {
        self.calendar.position_for_date(today)
    }

    pub fn progress(&self, id: TaskId) -> Option<u32> {
        self.task(id).map(progress::progress)
    }

    pub fn dashboard(&self, today: NaiveDate) -> (Vec<TaskStatusRow>, DashboardSummary) {
        let rows = dashboard::task_statuses(&self.tasks, today);
        let summary = dashboard::summarize(&rows);
        (rows, summary)
    }

    // Analytics

    pub fn total_hours(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
        window: Window,
        today: NaiveDate,
    ) -> f64 {
        analytics::total_hours(&self.sessions, task_id, subtask_id, window, today)
    }

    pub fn subtask_totals(&self, today: NaiveDate) -> Vec<SubtaskTotal> {
        analytics::subtask_totals(&self.tasks, &self.sessions, today)
    }

    // Timer operations

    /// Choose the subtask that completed work intervals are credited to.
    pub fn select_focus(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> PlannerResult<()> {
        let task = self.task(task_id).ok_or_else(|| not_found_task(task_id))?;
        if task.subtask(subtask_id).is_none() {
            return Err(not_found_subtask(subtask_id));
        }
        self.timer.set_focus(Some(FocusTarget::new(task_id, subtask_id)));
        Ok(())
    }

    pub fn clear_focus(&mut self) {
        self.timer.set_focus(None);
    }

    pub fn start_timer(&mut self) -> Result<(), StartRejected> {
        match self.timer.start() {
            Ok(()) => {
                tracing::debug!(phase = self.timer.phase().name(), "timer started");
                Ok(())
            }
            Err(rejected) => {
                tracing::warn!(%rejected, "timer start rejected");
                Err(rejected)
            }
        }
    }

    pub fn pause_timer(&mut self) {
        self.timer.pause();
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    /// Store new durations. The running countdown keeps its remaining time.
    pub fn set_timer_config(&mut self, config: TimerConfig) -> PlannerResult<()> {
        config.validate()?;
        self.timer.set_config(config);
        store::save_timer_config(&mut self.store, config)
    }

    pub fn tick(&mut self) -> PlannerResult<TickOutcome> {
        self.tick_at(Local::now())
    }

    /// Advance the timer by one second of wall-clock time ending at `now`.
    ///
    /// A finished work interval with a focus target is logged under `now`'s
    /// local date and the session log is persisted.
    pub fn tick_at(&mut self, now: DateTime<Local>) -> PlannerResult<TickOutcome> {
        let outcome = self.timer.tick(now.with_timezone(&Utc));

        if let TickOutcome::Completed(completion) = &outcome {
            tracing::debug!(
                finished = completion.finished.name(),
                next = completion.next.name(),
                completed_work = self.timer.completed_work(),
                "timer phase complete"
            );
            if let Some(record) = &completion.record {
                self.sessions
                    .entry(now.date_naive())
                    .or_default()
                    .push(record.clone());
                self.persist_sessions()?;
                tracing::info!(
                    task = %record.task_id,
                    subtask = %record.subtask_id,
                    minutes = record.duration_minutes,
                    "focus session recorded"
                );
            }
        }

        Ok(outcome)
    }

    fn task_mut(&mut self, id: TaskId) -> PlannerResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found_task(id))
    }

    fn persist_tasks(&mut self) -> PlannerResult<()> {
        store::save_record(&mut self.store, TASKS_KEY, &self.tasks)
    }

    fn persist_milestones(&mut self) -> PlannerResult<()> {
        store::save_record(&mut self.store, MILESTONES_KEY, &self.milestones)
    }

    fn persist_daily(&mut self) -> PlannerResult<()> {
        store::save_record(&mut self.store, DAILY_TASKS_KEY, &self.daily)
    }

    fn persist_sessions(&mut self) -> PlannerResult<()> {
        store::save_record(&mut self.store, SESSIONS_KEY, &self.sessions)
    }
}

/// The saved durations win over the config file. Whichever fails
/// validation is skipped, ending at the built-in defaults.
fn timer_config(saved: Option<TimerConfig>, config: &Config) -> TimerConfig {
    if let Some(saved) = saved {
        match saved.validate() {
            Ok(()) => return saved,
            Err(e) => tracing::warn!(error = %e, "ignoring saved timer config"),
        }
    }
    match config.timer.validate() {
        Ok(()) => config.timer,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring configured timer durations");
            TimerConfig::default()
        }
    }
}

fn build_window(config: &Config) -> Calendar {
    let c = config.calendar;
    let calendar = Calendar::build(c.start_month, c.start_year, c.end_month, c.end_year);
    if calendar.is_empty() {
        tracing::warn!(
            start = %format!("{}/{}", c.start_month, c.start_year),
            end = %format!("{}/{}", c.end_month, c.end_year),
            "calendar window is empty"
        );
    }
    calendar
}

fn require_name(name: &str) -> PlannerResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlannerError::Validation("name is empty".to_string()));
    }
    Ok(name)
}

/// Month must be 1-12 and the week must exist in that month, so week 5 of a
/// four-week month is refused rather than landing on the next month's first
/// week. Ordering between coordinates is not checked.
fn validate_coord(coord: WeekCoord) -> PlannerResult<()> {
    if !(1..=12).contains(&coord.month) {
        return Err(PlannerError::Validation(format!(
            "month {} out of range",
            coord.month
        )));
    }
    let weeks = weeks_in_month(coord.month);
    if !(1..=weeks).contains(&coord.week) {
        return Err(PlannerError::Validation(format!(
            "week {} out of range for month {} ({weeks} weeks)",
            coord.week, coord.month
        )));
    }
    Ok(())
}

fn not_found_task(id: TaskId) -> PlannerError {
    PlannerError::NotFound(format!("task {id}"))
}

fn not_found_subtask(id: SubtaskId) -> PlannerError {
    PlannerError::NotFound(format!("subtask {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TIMER_CONFIG_KEY};
    use crate::timer::Phase;
    use chrono::TimeZone;

    fn planner() -> Planner<MemoryStore> {
        Planner::with_store(MemoryStore::new(), Config::default()).unwrap()
    }

    fn at(month: u32, week: u32, year: i32) -> WeekCoord {
        WeekCoord::new(month, week, year)
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap()
    }

    fn quick_timer() -> TimerConfig {
        TimerConfig {
            work_mins: 1,
            break_mins: 1,
            long_break_mins: 1,
            long_break_every: 4,
        }
    }

    #[test]
    fn test_add_task_assigns_colors() {
        let mut planner = planner();
        let a = planner.add_task("A", at(10, 1, 2024), at(10, 4, 2024), Priority::High).unwrap();
        let b = planner.add_task("B", at(11, 1, 2024), at(11, 2, 2024), Priority::Low).unwrap();

        assert_eq!(planner.task(a).unwrap().color, COLOR_TAGS[0]);
        assert_eq!(planner.task(b).unwrap().color, COLOR_TAGS[1]);
        assert_eq!(planner.task(b).unwrap().priority, Priority::Low);
    }

    #[test]
    fn test_add_task_validation() {
        let mut planner = planner();
        assert!(planner.add_task("  ", at(1, 1, 2025), at(1, 1, 2025), Priority::Medium).is_err());
        assert!(planner.add_task("A", at(13, 1, 2025), at(1, 1, 2025), Priority::Medium).is_err());
        assert!(planner.add_task("A", at(1, 6, 2025), at(1, 1, 2025), Priority::Medium).is_err());
        assert!(planner.tasks().is_empty());

        // End before start is accepted; the span just comes out empty.
        let id = planner
            .add_task("Backwards", at(3, 1, 2025), at(1, 1, 2025), Priority::Medium)
            .unwrap();
        assert!(!planner.task_span(id).unwrap().is_visible());
    }

    #[test]
    fn test_mutations_persist() {
        let mut planner = planner();
        let id = planner
            .add_task("Paper", at(10, 1, 2024), at(12, 1, 2024), Priority::High)
            .unwrap();
        let sub = planner.add_subtask(id, "Draft").unwrap();
        planner.toggle_subtask(id, sub).unwrap();
        planner.add_milestone("Submit", at(12, 1, 2024)).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
        planner.add_daily_entry(day, "Email advisor").unwrap();

        let store = planner.into_store();
        let reloaded = Planner::with_store(store, Config::default()).unwrap();
        assert_eq!(reloaded.tasks().len(), 1);
        assert_eq!(reloaded.progress(id), Some(100));
        assert_eq!(reloaded.milestones()[0].name, "Submit");
        assert_eq!(reloaded.daily_entries(day)[0].text, "Email advisor");
    }

    #[test]
    fn test_update_task() {
        let mut planner = planner();
        let id = planner
            .add_task("Paper", at(10, 1, 2024), at(10, 1, 2024), Priority::High)
            .unwrap();
        planner
            .update_task(
                id,
                TaskEdit {
                    name: Some("Journal paper".to_string()),
                    end: Some(at(11, 2, 2024)),
                    ..TaskEdit::default()
                },
            )
            .unwrap();

        let task = planner.task(id).unwrap();
        assert_eq!(task.name, "Journal paper");
        assert_eq!(planner.task_span(id), Some(TaskSpan { start: 0, duration: 7 }));
        assert!(matches!(
            planner.update_task(id, TaskEdit { end: Some(at(0, 1, 2024)), ..TaskEdit::default() }),
            Err(PlannerError::Validation(_))
        ));
    }

    #[test]
    fn test_reorder_tasks() {
        let mut planner = planner();
        let a = planner.add_task("A", at(1, 1, 2025), at(1, 1, 2025), Priority::Medium).unwrap();
        let b = planner.add_task("B", at(1, 1, 2025), at(1, 1, 2025), Priority::Medium).unwrap();

        assert!(!planner.move_task_up(0).unwrap());
        assert!(!planner.move_task_down(1).unwrap());
        assert!(planner.move_task_down(0).unwrap());
        assert_eq!(planner.tasks()[0].id, b);
        assert!(planner.move_task_up(1).unwrap());
        assert_eq!(planner.tasks()[0].id, a);
    }

    #[test]
    fn test_toggle_expanded_and_delete() {
        let mut planner = planner();
        let id = planner.add_task("A", at(1, 1, 2025), at(2, 1, 2025), Priority::Medium).unwrap();
        assert!(planner.toggle_expanded(id).unwrap());
        assert!(!planner.toggle_expanded(id).unwrap());

        planner.delete_task(id).unwrap();
        assert!(planner.tasks().is_empty());
        assert!(matches!(planner.delete_task(id), Err(PlannerError::NotFound(_))));
    }

    #[test]
    fn test_deleting_focused_subtask_clears_focus() {
        let mut planner = planner();
        let id = planner.add_task("A", at(1, 1, 2025), at(2, 1, 2025), Priority::Medium).unwrap();
        let sub = planner.add_subtask(id, "Draft").unwrap();
        planner.select_focus(id, sub).unwrap();

        planner.delete_subtask(id, sub).unwrap();
        assert!(planner.timer().focus().is_none());
        assert_eq!(planner.start_timer(), Err(StartRejected::NoFocusTarget));
    }

    #[test]
    fn test_select_focus_checks_ids() {
        let mut planner = planner();
        let id = planner.add_task("A", at(1, 1, 2025), at(2, 1, 2025), Priority::Medium).unwrap();
        assert!(planner.select_focus(id, uuid::Uuid::new_v4()).is_err());
        assert!(planner.select_focus(uuid::Uuid::new_v4(), uuid::Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_focus_cycle_records_session() {
        let mut planner = planner();
        planner.set_timer_config(quick_timer()).unwrap();
        planner.reset_timer();
        let id = planner.add_task("Paper", at(3, 1, 2025), at(3, 4, 2025), Priority::High).unwrap();
        let sub = planner.add_subtask(id, "Draft").unwrap();
        planner.select_focus(id, sub).unwrap();
        planner.start_timer().unwrap();

        for _ in 0..60 {
            planner.tick_at(now()).unwrap();
        }

        assert_eq!(planner.timer().phase(), Phase::Break);
        let records = &planner.sessions()[&now().date_naive()];
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subtask_id, sub);
        assert_eq!(records[0].duration_minutes, 1);

        planner.start_timer().unwrap();
        for _ in 0..30 {
            planner.tick_at(now()).unwrap();
        }
        planner.reset_timer();
        assert_eq!(planner.timer().remaining_secs(), 60);
        assert_eq!(planner.timer().phase(), Phase::Break);
        assert_eq!(planner.timer().completed_work(), 1);

        let today = now().date_naive();
        assert_eq!(planner.total_hours(id, sub, Window::All, today), 0.0);
        let store = planner.into_store();
        let reloaded = Planner::with_store(store, Config::default()).unwrap();
        assert_eq!(reloaded.sessions()[&today].len(), 1);
        assert_eq!(reloaded.timer().config().work_mins, 1);
    }

    #[test]
    fn test_week_must_exist_in_month() {
        let mut planner = planner();
        let err = planner.add_task("A", at(2, 5, 2025), at(3, 1, 2025), Priority::Medium);
        assert!(matches!(err, Err(PlannerError::Validation(_))));
        assert!(planner.add_milestone("Defense", at(4, 5, 2025)).is_err());

        let id = planner
            .add_task("A", at(3, 5, 2025), at(3, 5, 2025), Priority::Medium)
            .unwrap();
        assert!(planner
            .update_task(id, TaskEdit { end: Some(at(6, 5, 2025)), ..TaskEdit::default() })
            .is_err());
        assert_eq!(planner.task(id).unwrap().end(), at(3, 5, 2025));
    }

    #[test]
    fn test_oversized_timer_config_rejected() {
        let mut planner = planner();
        let config = TimerConfig {
            work_mins: 100_000_000,
            ..TimerConfig::default()
        };
        assert!(planner.set_timer_config(config).is_err());
        planner.reset_timer();
        assert_eq!(planner.timer().remaining_secs(), 25 * 60);
    }

    #[test]
    fn test_invalid_saved_timer_config_falls_back() {
        let mut store = MemoryStore::new();
        store
            .put(
                TIMER_CONFIG_KEY,
                r#"{"workMins":100000000,"breakMins":5,"longBreakMins":15,"longBreakEvery":4}"#,
            )
            .unwrap();
        let config = Config {
            timer: TimerConfig {
                work_mins: 40,
                ..TimerConfig::default()
            },
            ..Config::default()
        };

        let planner = Planner::with_store(store, config).unwrap();
        assert_eq!(planner.timer().config().work_mins, 40);
        assert_eq!(planner.timer().remaining_secs(), 40 * 60);

        let config = Config {
            timer: TimerConfig {
                break_mins: 0,
                ..TimerConfig::default()
            },
            ..Config::default()
        };
        let planner = Planner::with_store(MemoryStore::new(), config).unwrap();
        assert_eq!(*planner.timer().config(), TimerConfig::default());
    }

    #[test]
    fn test_timer_config_rejects_zero() {
        let mut planner = planner();
        let config = TimerConfig {
            work_mins: 0,
            ..TimerConfig::default()
        };
        assert!(planner.set_timer_config(config).is_err());
        assert_eq!(planner.timer().config().work_mins, 25);
    }

    #[test]
    fn test_calendar_window_and_current_week() {
        let mut planner = planner();
        let today = NaiveDate::from_ymd_opt(2024, 11, 10).unwrap();
        assert_eq!(planner.current_week(today), Some(6));

        planner.set_calendar_window(1, 2025, 3, 2025);
        assert_eq!(planner.calendar().len(), 3);
        assert_eq!(planner.current_week(today), None);

        planner.set_calendar_window(5, 2025, 3, 2025);
        assert!(planner.calendar().is_empty());
    }

    #[test]
    fn test_dashboard_and_totals() {
        let mut planner = planner();
        let id = planner.add_task("Paper", at(3, 1, 2025), at(3, 1, 2025), Priority::High).unwrap();
        let sub = planner.add_subtask(id, "Draft").unwrap();
        planner.set_timer_config(quick_timer()).unwrap();
        planner.reset_timer();
        planner.select_focus(id, sub).unwrap();

        for _ in 0..30 {
            planner.start_timer().unwrap();
            for _ in 0..60 {
                planner.tick_at(now()).unwrap();
            }
            planner.start_timer().unwrap();
            for _ in 0..60 {
                planner.tick_at(now()).unwrap();
            }
        }

        let today = now().date_naive();
        assert_eq!(planner.total_hours(id, sub, Window::Week, today), 0.5);
        let totals = planner.subtask_totals(today);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].month_hours, 0.5);

        let (rows, summary) = planner.dashboard(today);
        assert_eq!(rows[0].days_until_due, Some(2));
        assert_eq!(summary.pending, 1);
    }
}
