//! One-second pulse driving the interval timer.
//!
//! [`run_pulse`] owns the planner for the lifetime of a session. Commands
//! arrive on one channel and timer events leave on another.

use crate::error::{PlannerError, PlannerResult};
use crate::models::FocusTarget;
use crate::planner::Planner;
use crate::store::KeyValueStore;
use crate::timer::{PhaseCompletion, StartRejected, TickOutcome};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Interval between timer ticks.
pub const PULSE: Duration = Duration::from_secs(1);

/// Control message for the pulse loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
    /// Select a focus target, or clear it with `None`.
    Focus(Option<FocusTarget>),
    Shutdown,
}

/// Event emitted by the pulse loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed in the running phase.
    Tick { remaining_secs: u32 },
    PhaseCompleted(PhaseCompletion),
    StartRejected(StartRejected),
}

/// Run until [`TimerCommand::Shutdown`] or until the command sender drops.
///
/// Ticks are only delivered while the timer is running. A start restarts the
/// pulse so the first tick lands a full second later.
pub async fn run_pulse<S: KeyValueStore>(
    planner: &mut Planner<S>,
    mut commands: mpsc::Receiver<TimerCommand>,
    events: mpsc::Sender<TimerEvent>,
) -> PlannerResult<()> {
    let mut ticker = time::interval_at(Instant::now() + PULSE, PULSE);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    None | Some(TimerCommand::Shutdown) => break,
                    Some(TimerCommand::Start) => match planner.start_timer() {
                        Ok(()) => ticker.reset(),
                        Err(rejected) => emit(&events, TimerEvent::StartRejected(rejected)).await?,
                    },
                    Some(TimerCommand::Pause) => planner.pause_timer(),
                    Some(TimerCommand::Reset) => planner.reset_timer(),
                    Some(TimerCommand::Focus(Some(target))) => {
                        if let Err(e) = planner.select_focus(target.task_id, target.subtask_id) {
                            tracing::warn!(error = %e, "focus target ignored");
                        }
                    }
                    Some(TimerCommand::Focus(None)) => planner.clear_focus(),
                }
            }
            _ = ticker.tick(), if planner.timer().is_running() => {
                match planner.tick()? {
                    TickOutcome::Idle => {}
                    TickOutcome::Counting { remaining_secs } => {
                        emit(&events, TimerEvent::Tick { remaining_secs }).await?;
                    }
                    TickOutcome::Completed(completion) => {
                        emit(&events, TimerEvent::PhaseCompleted(completion)).await?;
                    }
                }
            }
        }
    }

    tracing::debug!("pulse stopped");
    Ok(())
}

async fn emit(events: &mpsc::Sender<TimerEvent>, event: TimerEvent) -> PlannerResult<()> {
    events
        .send(event)
        .await
        .map_err(|_| PlannerError::Pulse("event receiver dropped".to_string()))
}
