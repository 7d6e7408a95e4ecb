//! Main application state: the registry of mounted timers

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{validate_work_minutes, TimerError, TimerResult},
    notify::Notifier,
    tasks::{TimerHandle, TICK_PERIOD},
    utils::format_uptime,
};
use super::TimerSnapshot;

/// Server-wide values the registry and status endpoint need
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Work duration for timers mounted without one
    pub default_work_minutes: u32,
    /// Title for timers mounted without one
    pub default_title: String,
    pub tick_period: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            default_work_minutes: crate::state::DEFAULT_WORK_MINUTES,
            default_title: "Workout Timer".to_string(),
            tick_period: TICK_PERIOD,
        }
    }
}

/// Main application state shared by every handler
pub struct AppState {
    pub settings: ServerSettings,
    /// Mounted timers by id
    timers: Mutex<HashMap<Uuid, TimerHandle>>,
    notifier: Arc<dyn Notifier>,
    pub start_time: Instant,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    pub fn new(settings: ServerSettings, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            settings,
            timers: Mutex::new(HashMap::new()),
            notifier,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
        }
    }

    /// Mount a new timer, falling back to the configured title and duration
    pub fn mount(
        &self,
        title: Option<String>,
        work_minutes: Option<u32>,
    ) -> TimerResult<TimerSnapshot> {
        let work_minutes =
            validate_work_minutes(work_minutes.unwrap_or(self.settings.default_work_minutes))?;
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.settings.default_title.clone());

        let id = Uuid::new_v4();
        let handle = TimerHandle::spawn(
            id,
            title,
            work_minutes,
            Arc::clone(&self.notifier),
            self.settings.tick_period,
        );
        let snapshot = handle.snapshot();

        self.lock_timers()?.insert(id, handle);
        self.record_action("mount");
        info!("Mounted timer {} ({} min)", id, work_minutes);
        Ok(snapshot)
    }

    /// Unmount a timer and stop its task
    pub async fn unmount(&self, id: Uuid) -> TimerResult<()> {
        let handle = self.lock_timers()?.remove(&id).ok_or(TimerError::NotFound(id))?;
        handle.shutdown().await;
        self.record_action("unmount");
        info!("Unmounted timer {}", id);
        Ok(())
    }

    /// Look up a timer handle by id
    pub fn handle(&self, id: Uuid) -> TimerResult<TimerHandle> {
        self.lock_timers()?
            .get(&id)
            .cloned()
            .ok_or(TimerError::NotFound(id))
    }

    pub fn get(&self, id: Uuid) -> TimerResult<TimerSnapshot> {
        self.handle(id).map(|handle| handle.snapshot())
    }

    /// Snapshots of every mounted timer, sorted by title
    pub fn list(&self) -> TimerResult<Vec<TimerSnapshot>> {
        let mut snapshots: Vec<TimerSnapshot> = self
            .lock_timers()?
            .values()
            .map(TimerHandle::snapshot)
            .collect();
        snapshots.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(snapshots)
    }

    pub fn timer_count(&self) -> usize {
        self.lock_timers().map(|timers| timers.len()).unwrap_or(0)
    }

    /// Stop every timer task, used on shutdown
    pub async fn unmount_all(&self) {
        let handles: Vec<TimerHandle> = match self.lock_timers() {
            Ok(mut timers) => timers.drain().map(|(_, handle)| handle).collect(),
            Err(_) => return,
        };
        for handle in handles {
            handle.shutdown().await;
        }
    }

    /// Remember the last control action for the status endpoint
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some((action.to_string(), Utc::now()));
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    fn lock_timers(&self) -> TimerResult<std::sync::MutexGuard<'_, HashMap<Uuid, TimerHandle>>> {
        self.timers
            .lock()
            .map_err(|_| TimerError::LockPoisoned("timer registry"))
    }
}
