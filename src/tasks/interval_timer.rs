//! Per-timer background task and the handle used to drive it

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{TimerError, TimerResult},
    notify::{notify_if_permitted, request_permission_if_undecided, Notifier},
    state::{TimerEvent, TimerSnapshot, TimerState},
};

/// Nominal period between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;

/// Messages accepted by a timer task
#[derive(Debug)]
pub enum TimerCommand {
    Apply(TimerEvent, oneshot::Sender<TimerSnapshot>),
    /// Reinitialize only if the work duration actually changed
    SetWorkDuration(u32, oneshot::Sender<TimerSnapshot>),
    Shutdown,
}

/// Cloneable handle to one mounted timer
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: Uuid,
    commands: mpsc::Sender<TimerCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
}

impl TimerHandle {
    /// Mount a timer: request notification permission and spawn its task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        id: Uuid,
        title: String,
        work_duration_minutes: u32,
        notifier: Arc<dyn Notifier>,
        tick_period: Duration,
    ) -> Self {
        request_permission_if_undecided(notifier.as_ref());

        let state = TimerState::new(work_duration_minutes);
        let initial = TimerSnapshot::capture(id, &title, &state);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);

        let task = IntervalTimerTask {
            id,
            title,
            state,
            notifier,
            tick_period,
            snapshot_tx,
        };
        tokio::spawn(task.run(command_rx));

        Self {
            id,
            commands: command_tx,
            snapshots: snapshot_rx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }

    pub async fn start(&self) -> TimerResult<TimerSnapshot> {
        self.apply(TimerEvent::Start).await
    }

    pub async fn toggle(&self) -> TimerResult<TimerSnapshot> {
        self.apply(TimerEvent::Toggle).await
    }

    pub async fn reset(&self) -> TimerResult<TimerSnapshot> {
        self.apply(TimerEvent::Reset).await
    }

    pub async fn reinitialize(&self, work_duration_minutes: u32) -> TimerResult<TimerSnapshot> {
        self.apply(TimerEvent::Reinitialize(work_duration_minutes)).await
    }

    pub async fn set_work_duration(
        &self,
        work_duration_minutes: u32,
    ) -> TimerResult<TimerSnapshot> {
        self.request(|reply| TimerCommand::SetWorkDuration(work_duration_minutes, reply))
            .await
    }

    /// Stop the task. Later requests fail with [`TimerError::Stopped`].
    pub async fn shutdown(&self) {
        if self.commands.send(TimerCommand::Shutdown).await.is_err() {
            debug!("Timer {} already stopped", self.id);
        }
    }

    async fn apply(&self, event: TimerEvent) -> TimerResult<TimerSnapshot> {
        self.request(|reply| TimerCommand::Apply(event, reply)).await
    }

    async fn request<F>(&self, build: F) -> TimerResult<TimerSnapshot>
    where
        F: FnOnce(oneshot::Sender<TimerSnapshot>) -> TimerCommand,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(build(reply_tx))
            .await
            .map_err(|_| TimerError::Stopped(self.id))?;
        reply_rx.await.map_err(|_| TimerError::Stopped(self.id))
    }
}

/// Owns one timer's state; commands and ticks are applied here in order
struct IntervalTimerTask {
    id: Uuid,
    title: String,
    state: TimerState,
    notifier: Arc<dyn Notifier>,
    tick_period: Duration,
    snapshot_tx: watch::Sender<TimerSnapshot>,
}

impl IntervalTimerTask {
    async fn run(mut self, mut commands: mpsc::Receiver<TimerCommand>) {
        info!(
            "Timer {} mounted ({}, {} min work)",
            self.id, self.title, self.state.work_duration_minutes
        );

        let mut ticker: Option<Interval> = None;

        loop {
            self.sync_ticker(&mut ticker);

            tokio::select! {
                // Commands win ties so a pause lands before a pending tick
                biased;

                command = commands.recv() => match command {
                    Some(TimerCommand::Apply(event, reply)) => {
                        self.handle(event);
                        let _ = reply.send(self.publish());
                    }
                    Some(TimerCommand::SetWorkDuration(minutes, reply)) => {
                        if minutes != self.state.work_duration_minutes {
                            self.handle(TimerEvent::Reinitialize(minutes));
                        }
                        let _ = reply.send(self.publish());
                    }
                    Some(TimerCommand::Shutdown) | None => break,
                },

                _ = next_tick(&mut ticker) => {
                    self.handle(TimerEvent::Tick);
                    self.publish();
                }
            }
        }

        info!("Timer {} unmounted", self.id);
    }

    /// Arm the interval when the timer starts running, drop it when it stops
    fn sync_ticker(&self, ticker: &mut Option<Interval>) {
        match (self.state.running, ticker.is_some()) {
            (true, false) => {
                let first_tick = Instant::now() + self.tick_period;
                let mut interval = interval_at(first_tick, self.tick_period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(interval);
                debug!("Timer {} ticking", self.id);
            }
            (false, true) => {
                *ticker = None;
                debug!("Timer {} idle", self.id);
            }
            _ => {}
        }
    }

    fn handle(&mut self, event: TimerEvent) {
        if event != TimerEvent::Tick {
            debug!("Timer {} received {:?}", self.id, event);
        }

        if let Some(completion) = self.state.apply(event) {
            info!("Timer {} completed a phase: {:?}", self.id, completion);
            notify_if_permitted(self.notifier.as_ref(), completion.message());
        }
    }

    fn publish(&self) -> TimerSnapshot {
        let snapshot = TimerSnapshot::capture(self.id, &self.title, &self.state);
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
