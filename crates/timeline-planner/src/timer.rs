//! Work/break interval timer.
//!
//! A single countdown alternating between work and break phases. Every
//! `long_break_every`-th completed work phase is followed by a long break.
//! The timer never continues on its own: after any phase change it stops
//! and waits for an explicit [`IntervalTimer::start`].

use crate::config::TimerConfig;
use crate::models::{FocusTarget, SessionRecord};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break)
    }
}

/// Why a start request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartRejected {
    /// Work phases need a focus target to credit.
    #[error("select a task and subtask before starting a work interval")]
    NoFocusTarget,
}

/// Snapshot of the countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub remaining_secs: u32,
    pub phase: Phase,
    pub completed_work: u32,
    pub running: bool,
    pub focus: Option<FocusTarget>,
}

/// A phase that ran out on this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseCompletion {
    pub finished: Phase,
    pub next: Phase,
    /// Set only for a finished work phase with a focus target.
    pub record: Option<SessionRecord>,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running; nothing changed.
    Idle,
    /// Counted down one second.
    Counting { remaining_secs: u32 },
    Completed(PhaseCompletion),
}

/// Interval timer state machine.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    config: TimerConfig,
    state: TimerState,
}

impl IntervalTimer {
    /// Create a stopped timer at the start of a work phase.
    pub fn new(config: TimerConfig) -> Self {
        let remaining_secs = config.work_mins.saturating_mul(60);
        Self {
            config,
            state: TimerState {
                remaining_secs,
                phase: Phase::Work,
                completed_work: 0,
                running: false,
                focus: None,
            },
        }
    }

    /// Start or resume the countdown.
    ///
    /// Refused, with no state change, when a work phase has no focus target.
    pub fn start(&mut self) -> Result<(), StartRejected> {
        if self.state.phase == Phase::Work && self.state.focus.is_none() {
            return Err(StartRejected::NoFocusTarget);
        }
        self.state.running = true;
        Ok(())
    }

    /// Stop counting, keeping the remaining time and phase.
    pub fn pause(&mut self) {
        self.state.running = false;
    }

    pub fn toggle(&mut self) -> Result<(), StartRejected> {
        if self.state.running {
            self.pause();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Stop and restart the countdown for the current phase.
    ///
    /// Neither the phase nor the completed work count changes.
    pub fn reset(&mut self) {
        self.state.running = false;
        self.state.remaining_secs = self.phase_secs();
    }

    /// Advance one elapsed second.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        if self.state.remaining_secs > 1 {
            self.state.remaining_secs -= 1;
            return TickOutcome::Counting {
                remaining_secs: self.state.remaining_secs,
            };
        }

        TickOutcome::Completed(self.complete_phase(now))
    }

    fn complete_phase(&mut self, now: DateTime<Utc>) -> PhaseCompletion {
        self.state.running = false;
        let finished = self.state.phase;

        let record = match finished {
            Phase::Work => {
                let record = self
                    .state
                    .focus
                    .map(|target| SessionRecord::new(target, self.config.work_mins, now));
                self.state.completed_work += 1;
                self.state.phase = Phase::Break;
                record
            }
            Phase::Break => {
                self.state.phase = Phase::Work;
                None
            }
        };
        self.state.remaining_secs = self.phase_secs();

        PhaseCompletion {
            finished,
            next: self.state.phase,
            record,
        }
    }

    fn long_break_due(&self) -> bool {
        let every = self.config.long_break_every.max(1);
        self.state.completed_work % every == 0
    }

    /// Configured length of the current phase, in seconds.
    pub fn phase_secs(&self) -> u32 {
        let mins = match self.state.phase {
            Phase::Work => self.config.work_mins,
            Phase::Break if self.long_break_due() => self.config.long_break_mins,
            Phase::Break => self.config.break_mins,
        };
        mins.saturating_mul(60)
    }

    /// Replace the durations. The running countdown is not rescaled.
    pub fn set_config(&mut self, config: TimerConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn set_focus(&mut self, focus: Option<FocusTarget>) {
        self.state.focus = focus;
    }

    pub fn focus(&self) -> Option<FocusTarget> {
        self.state.focus
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn completed_work(&self) -> u32 {
        self.state.completed_work
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Fraction of the current phase elapsed (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.phase_secs());
        if total <= 0.0 {
            return 0.0;
        }
        let elapsed = total - f64::from(self.state.remaining_secs);
        (elapsed / total).clamp(0.0, 1.0)
    }

    /// Work phases left before the next long break.
    pub fn until_long_break(&self) -> u32 {
        let every = self.config.long_break_every.max(1);
        every - self.state.completed_work % every
    }

    /// Format remaining time as MM:SS.
    pub fn format_remaining(&self) -> String {
        let secs = self.state.remaining_secs;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
