//! Configuration and CLI argument handling

use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::{
    error::MAX_WORK_MINUTES,
    notify::{LogNotifier, Notifier, Permission},
    state::ServerSettings,
    tasks::TICK_PERIOD,
};

/// How the process answers notification permission requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotificationMode {
    /// Start undecided and grant on the first request
    Ask,
    /// Already granted
    Granted,
    /// Already denied; phase completions are only logged at debug level
    Denied,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "workout-timer")]
#[command(about = "A state-managed HTTP server hosting workout/break interval timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, env = "WORKOUT_TIMER_PORT", default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "WORKOUT_TIMER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Work phase length in minutes for timers mounted without one
    #[arg(
        short,
        long = "work-minutes",
        env = "WORKOUT_TIMER_WORK_MINUTES",
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WORK_MINUTES))
    )]
    pub work_minutes: u32,

    /// Title for timers mounted without one
    #[arg(long, env = "WORKOUT_TIMER_TITLE", default_value = "Workout Timer")]
    pub title: String,

    /// Notification permission behaviour
    #[arg(long, env = "WORKOUT_TIMER_NOTIFICATIONS", value_enum, default_value = "ask")]
    pub notifications: NotificationMode,

    /// Do not mount a timer at startup
    #[arg(long)]
    pub no_default_timer: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            host: self.host.clone(),
            port: self.port,
            default_work_minutes: self.work_minutes,
            default_title: self.title.clone(),
            tick_period: TICK_PERIOD,
        }
    }

    /// Build the process-wide notifier for the chosen mode
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        let initial = match self.notifications {
            NotificationMode::Ask => Permission::Default,
            NotificationMode::Granted => Permission::Granted,
            NotificationMode::Denied => Permission::Denied,
        };
        Arc::new(LogNotifier::new(initial, true))
    }
}
