//! Durable key-value storage for planner records.
//!
//! Each collection is stored as one JSON document under a fixed key and is
//! rewritten in full after every mutation.

use crate::config::{CalendarConfig, TimerConfig};
use crate::error::PlannerResult;
use crate::models::{DailyTaskLog, Milestone, Priority, SessionLog, Subtask, Task, COLOR_TAGS};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

pub const TASKS_KEY: &str = "tasks";
pub const MILESTONES_KEY: &str = "milestones";
pub const DAILY_TASKS_KEY: &str = "dailyTasks";
pub const SESSIONS_KEY: &str = "sessions";
pub const TIMER_CONFIG_KEY: &str = "timerConfig";

/// String key-value storage backing the planner.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PlannerResult<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> PlannerResult<()>;
}

/// SQLite-backed store.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> PlannerResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened planner database");
        Ok(db)
    }

    pub fn in_memory() -> PlannerResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> PlannerResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM records WHERE key = ?1")?;
        let value = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match value {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> PlannerResult<()> {
        self.conn.execute(
            "INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// Volatile store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> PlannerResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Decode the record under `key`, or its default when absent.
pub fn load_record<T, S>(store: &S, key: &str) -> PlannerResult<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

pub fn save_record<T, S>(store: &mut S, key: &str, value: &T) -> PlannerResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw)
}

/// Everything the planner reads at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerData {
    pub tasks: Vec<Task>,
    pub milestones: Vec<Milestone>,
    pub daily: DailyTaskLog,
    pub sessions: SessionLog,
    /// `None` until the user has edited the durations.
    pub timer_config: Option<TimerConfig>,
}

pub fn load_data<S>(store: &S, window: &CalendarConfig) -> PlannerResult<PlannerData>
where
    S: KeyValueStore + ?Sized,
{
    Ok(PlannerData {
        tasks: load_tasks(store, window)?,
        milestones: load_record(store, MILESTONES_KEY)?,
        daily: load_record(store, DAILY_TASKS_KEY)?,
        sessions: load_record(store, SESSIONS_KEY)?,
        timer_config: load_timer_config(store)?,
    })
}

pub fn save_data<S>(store: &mut S, data: &PlannerData) -> PlannerResult<()>
where
    S: KeyValueStore + ?Sized,
{
    save_record(store, TASKS_KEY, &data.tasks)?;
    save_record(store, MILESTONES_KEY, &data.milestones)?;
    save_record(store, DAILY_TASKS_KEY, &data.daily)?;
    save_record(store, SESSIONS_KEY, &data.sessions)?;
    if let Some(config) = data.timer_config {
        save_timer_config(store, config)?;
    }
    Ok(())
}

/// The saved durations, if the user has ever edited them.
pub fn load_timer_config<S>(store: &S) -> PlannerResult<Option<TimerConfig>>
where
    S: KeyValueStore + ?Sized,
{
    match store.get(TIMER_CONFIG_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str::<StoredTimerConfig>(&raw)?.into())),
        None => Ok(None),
    }
}

pub fn save_timer_config<S>(store: &mut S, config: TimerConfig) -> PlannerResult<()>
where
    S: KeyValueStore + ?Sized,
{
    save_record(store, TIMER_CONFIG_KEY, &StoredTimerConfig::from(config))
}

/// Load tasks, migrating records written before years were explicit.
pub fn load_tasks<S>(store: &S, window: &CalendarConfig) -> PlannerResult<Vec<Task>>
where
    S: KeyValueStore + ?Sized,
{
    let stored: Vec<StoredTask> = load_record(store, TASKS_KEY)?;
    let legacy = stored.iter().filter(|t| t.is_legacy()).count();
    if legacy > 0 {
        tracing::info!(count = legacy, "migrating tasks without explicit years");
    }
    Ok(stored.into_iter().map(|t| t.into_task(window)).collect())
}

/// Persisted form of [`TimerConfig`]. The TOML file keeps snake_case keys.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTimerConfig {
    work_mins: u32,
    break_mins: u32,
    long_break_mins: u32,
    long_break_every: u32,
}

impl From<TimerConfig> for StoredTimerConfig {
    fn from(c: TimerConfig) -> Self {
        Self {
            work_mins: c.work_mins,
            break_mins: c.break_mins,
            long_break_mins: c.long_break_mins,
            long_break_every: c.long_break_every,
        }
    }
}

impl From<StoredTimerConfig> for TimerConfig {
    fn from(c: StoredTimerConfig) -> Self {
        Self {
            work_mins: c.work_mins,
            break_mins: c.break_mins,
            long_break_mins: c.long_break_mins,
            long_break_every: c.long_break_every,
        }
    }
}

/// Ids are UUIDs; early records used plain integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Uuid(Uuid),
    Legacy(u64),
}

impl StoredId {
    fn into_uuid(self) -> Uuid {
        match self {
            Self::Uuid(id) => id,
            Self::Legacy(n) => Uuid::from_u64_pair(0, n),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StoredSubtask {
    id: StoredId,
    name: String,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: StoredId,
    name: String,
    start_month: u32,
    start_week: u32,
    #[serde(default)]
    start_year: Option<i32>,
    end_month: u32,
    end_week: u32,
    #[serde(default)]
    end_year: Option<i32>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    expanded: bool,
    #[serde(default)]
    subtasks: Vec<StoredSubtask>,
}

impl StoredTask {
    fn is_legacy(&self) -> bool {
        self.start_year.is_none() || self.end_year.is_none()
    }

    /// Years missing from a record are inferred from the window start:
    /// months from the start month onward belong to the first year, earlier
    /// months to the next.
    fn into_task(self, window: &CalendarConfig) -> Task {
        let first = window.start_year;
        let next = first + 1;
        let start_year = self.start_year.unwrap_or(if self.start_month >= window.start_month {
            first
        } else {
            next
        });
        let end_rolls_over = self.end_month < window.start_month
            || (self.end_month == window.start_month && start_year == next);
        let end_year = self
            .end_year
            .unwrap_or(if end_rolls_over { next } else { first });

        Task {
            id: self.id.into_uuid(),
            name: self.name,
            start_month: self.start_month,
            start_week: self.start_week,
            start_year,
            end_month: self.end_month,
            end_week: self.end_week,
            end_year,
            color: self.color.unwrap_or_else(|| COLOR_TAGS[0].to_string()),
            priority: self.priority,
            expanded: self.expanded,
            subtasks: self
                .subtasks
                .into_iter()
                .map(|s| Subtask {
                    id: s.id.into_uuid(),
                    name: s.name,
                    completed: s.completed,
                })
                .collect(),
        }
    }
}
