//! State management module
//! 
//! This module contains the timer state machine, its client-facing snapshot,
//! and the registry of mounted timers.

pub mod app_state;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, ServerSettings};
pub use snapshot::TimerSnapshot;
pub use timer_state::{
    transition, PhaseCompletion, PhaseKind, TimerEvent, TimerState, BREAK_DURATION_MINUTES,
    DEFAULT_WORK_MINUTES,
};
