//! Rehearsal stopwatch driven by a tokio ticker.
//!
//! A [`PracticeSession`] owns at most one ticker task at a time. The task is
//! aborted on pause, reset, restart and drop, so no tick outlives the state
//! that scheduled it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::domain::{PracticeTimer, TimerState};

/// Point-in-time view of the stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub elapsed: u64,
}

impl From<&PracticeTimer> for TimerSnapshot {
    fn from(timer: &PracticeTimer) -> Self {
        Self {
            state: timer.state(),
            elapsed: timer.elapsed(),
        }
    }
}

/// Control typed by the user during practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeCommand {
    Start,
    Pause,
    Reset,
    Quit,
}

impl std::str::FromStr for PracticeCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "start" | "play" => Ok(Self::Start),
            "p" | "pause" => Ok(Self::Pause),
            "r" | "reset" => Ok(Self::Reset),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!(
                "Unknown control: {other}. Use: s (start), p (pause), r (reset), q (quit)"
            )),
        }
    }
}

/// Stopwatch plus the single tick source that drives it.
///
/// Must be used from within a tokio runtime.
pub struct PracticeSession {
    timer: Arc<Mutex<PracticeTimer>>,
    period: Duration,
    ticker: Option<JoinHandle<()>>,
    updates: watch::Sender<TimerSnapshot>,
}

impl PracticeSession {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let timer = PracticeTimer::new();
        let (updates, _) = watch::channel(TimerSnapshot::from(&timer));

        Self {
            timer: Arc::new(Mutex::new(timer)),
            period,
            ticker: None,
            updates,
        }
    }

    /// Receive a snapshot after every state change and tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.updates.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&*lock(&self.timer))
    }

    /// Whether a ticker task is currently scheduled.
    #[must_use]
    pub fn has_active_ticker(&self) -> bool {
        self.ticker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Idle/Paused → Running. Already running: no new tick source.
    pub fn start(&mut self) {
        if !lock(&self.timer).start() {
            tracing::debug!(
                ticker = self.has_active_ticker(),
                "Practice timer already running"
            );
            return;
        }

        self.cancel_ticker();
        self.ticker = Some(tokio::spawn(run_ticker(
            Arc::clone(&self.timer),
            self.period,
            self.updates.clone(),
        )));
        tracing::debug!(period_ms = self.period.as_millis(), "Practice timer started");
        self.publish();
    }

    /// Running → Paused, keeping the elapsed time.
    pub fn pause(&mut self) {
        if lock(&self.timer).pause() {
            self.cancel_ticker();
            tracing::debug!(elapsed = self.snapshot().elapsed, "Practice timer paused");
            self.publish();
        }
    }

    /// Any state → Idle with zero elapsed time.
    pub fn reset(&mut self) {
        self.cancel_ticker();
        lock(&self.timer).reset();
        tracing::debug!("Practice timer reset");
        self.publish();
    }

    /// Apply a user control. Returns `false` for [`PracticeCommand::Quit`].
    pub fn apply(&mut self, command: PracticeCommand) -> bool {
        match command {
            PracticeCommand::Start => self.start(),
            PracticeCommand::Pause => self.pause(),
            PracticeCommand::Reset => self.reset(),
            PracticeCommand::Quit => return false,
        }
        true
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

impl Drop for PracticeSession {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

async fn run_ticker(
    timer: Arc<Mutex<PracticeTimer>>,
    period: Duration,
    updates: watch::Sender<TimerSnapshot>,
) {
    // First tick one full period after start.
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let snapshot = {
            let mut timer = lock(&timer);
            if !timer.tick() {
                break;
            }
            TimerSnapshot::from(&*timer)
        };
        updates.send_replace(snapshot);
    }
}

fn lock(timer: &Mutex<PracticeTimer>) -> MutexGuard<'_, PracticeTimer> {
    timer.lock().unwrap_or_else(PoisonError::into_inner)
}
