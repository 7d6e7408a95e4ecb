//! Workout Timer - A state-managed HTTP server hosting interval timers
//! 
//! Each timer alternates a work phase with a fixed five-minute break,
//! counts down once per second, and raises a local notification when a
//! phase completes.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod notify;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, ServerSettings, TimerSnapshot, TimerState};
pub use api::create_router;
pub use tasks::TimerHandle;
pub use utils::signals::shutdown_signal;
