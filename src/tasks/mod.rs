//! Background tasks module
//! 
//! Each mounted timer runs as its own task alongside the HTTP server.

pub mod interval_timer;

// Re-export main types
pub use interval_timer::{TimerCommand, TimerHandle, TICK_PERIOD};
