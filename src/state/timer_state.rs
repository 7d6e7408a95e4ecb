//! Interval timer state and its transition function

use serde::{Deserialize, Serialize};

/// Length of every break phase, in minutes
pub const BREAK_DURATION_MINUTES: u32 = 5;

/// Work duration used when the caller does not supply one
pub const DEFAULT_WORK_MINUTES: u32 = 25;

/// Which countdown is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Work,
    Break,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Work => "work",
            PhaseKind::Break => "break",
        }
    }

    /// Short line shown under the timer title
    pub fn headline(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Focus on your workout.",
            PhaseKind::Break => "Time for a break!",
        }
    }
}

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Start,
    Toggle,
    Reset,
    Reinitialize(u32),
    Tick,
}

/// A phase that ran all the way down to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseCompletion {
    WorkFinished,
    BreakFinished,
}

impl PhaseCompletion {
    /// Text of the local notification for this completion
    pub fn message(&self) -> &'static str {
        match self {
            PhaseCompletion::WorkFinished => "Workout session finished! Time for a break.",
            PhaseCompletion::BreakFinished => "Break is over! Time to get back to work.",
        }
    }
}

/// Countdown state for a single timer instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub phase: PhaseKind,
    pub remaining_seconds: u64,
    pub running: bool,
    pub started: bool,
    pub work_duration_minutes: u32,
}

impl TimerState {
    /// Create a stopped timer at the top of a work phase
    pub fn new(work_duration_minutes: u32) -> Self {
        Self {
            phase: PhaseKind::Work,
            remaining_seconds: u64::from(work_duration_minutes) * 60,
            running: false,
            started: false,
            work_duration_minutes,
        }
    }

    /// Full length of the given phase in seconds
    pub fn phase_duration_seconds(&self, phase: PhaseKind) -> u64 {
        match phase {
            PhaseKind::Work => u64::from(self.work_duration_minutes) * 60,
            PhaseKind::Break => u64::from(BREAK_DURATION_MINUTES) * 60,
        }
    }

    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.running = true;
    }

    pub fn toggle(&mut self) {
        if !self.started {
            self.started = true;
        }
        self.running = !self.running;
    }

    /// Rewind the current phase. A break keeps going; work has to be started again.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.phase_duration_seconds(self.phase);
        match self.phase {
            PhaseKind::Break => {
                self.started = true;
                self.running = true;
            }
            PhaseKind::Work => {
                self.started = false;
                self.running = false;
            }
        }
    }

    /// Discard everything and go back to a stopped work phase
    pub fn reinitialize(&mut self, work_duration_minutes: u32) {
        *self = Self::new(work_duration_minutes);
    }

    /// Advance one second. Returns the completed phase when the countdown hits zero.
    pub fn tick(&mut self) -> Option<PhaseCompletion> {
        if !self.running {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        match self.phase {
            PhaseKind::Work => {
                self.phase = PhaseKind::Break;
                self.remaining_seconds = self.phase_duration_seconds(PhaseKind::Break);
                self.running = true;
                self.started = true;
                Some(PhaseCompletion::WorkFinished)
            }
            PhaseKind::Break => {
                self.phase = PhaseKind::Work;
                self.remaining_seconds = self.phase_duration_seconds(PhaseKind::Work);
                self.running = false;
                self.started = false;
                Some(PhaseCompletion::BreakFinished)
            }
        }
    }

    /// Apply one event in place
    pub fn apply(&mut self, event: TimerEvent) -> Option<PhaseCompletion> {
        match event {
            TimerEvent::Start => self.start(),
            TimerEvent::Toggle => self.toggle(),
            TimerEvent::Reset => self.reset(),
            TimerEvent::Reinitialize(minutes) => self.reinitialize(minutes),
            TimerEvent::Tick => return self.tick(),
        }
        None
    }

    /// Zero-padded `mm:ss` of the remaining time
    pub fn display(&self) -> String {
        crate::utils::format_mmss(self.remaining_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_MINUTES)
    }
}

/// Pure transition: `(state, event) -> (state', completion)`
pub fn transition(state: &TimerState, event: TimerEvent) -> (TimerState, Option<PhaseCompletion>) {
    let mut next = state.clone();
    let completion = next.apply(event);
    (next, completion)
}
