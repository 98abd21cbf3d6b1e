//! Practice stopwatch state machine.
//!
//! Pure in-memory model: no clock, no tasks. Whoever owns the tick source
//! calls [`PracticeTimer::tick`] once per interval.

use serde::Serialize;

/// Lifecycle of the practice stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Zeroed and not ticking.
    #[default]
    Idle,
    /// Ticking.
    Running,
    /// Frozen at a non-reset value.
    Paused,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// Elapsed-time stopwatch counting whole seconds.
///
/// `elapsed` only grows, one step per [`tick`](Self::tick) while running,
/// and only returns to zero through [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct PracticeTimer {
    state: TimerState,
    elapsed: u64,
}

impl PracticeTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed: 0,
        }
    }

    /// Move to `Running`. Returns `true` if the timer was not already running,
    /// i.e. the caller has to arm a tick source.
    pub fn start(&mut self) -> bool {
        if self.state == TimerState::Running {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    /// Move `Running` to `Paused`. Returns `true` if a tick source has to be
    /// released.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        true
    }

    /// Zero the elapsed time and go back to `Idle` from any state.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.elapsed = 0;
    }

    /// Advance by one interval. Ignored unless running.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        true
    }

    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }
}

/// Render whole seconds as `MM:SS`. Minutes are not capped at 59.
#[must_use]
pub fn format_elapsed(elapsed: u64) -> String {
    format!("{:02}:{:02}", elapsed / 60, elapsed % 60)
}
