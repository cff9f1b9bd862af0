//! Heartbeat accrual engine.
//!
//! A [`Tracker`] owns the tracking session and the ledger. It is driven either
//! directly (`init`, `on_event`, `shutdown`) or as a single task through
//! [`Tracker::run`], which serializes host events, heartbeat ticks and
//! dashboard requests so that at most one ledger write is ever in flight.

mod dispatcher;
pub mod evaluator;
pub mod media;
pub mod session;

pub use media::MediaSignal;
pub use session::{SessionSnapshot, TrackingSession};

use crate::config::TrackerConfig;
use crate::constants::COMMAND_CHANNEL_CAPACITY;
use crate::error::AppError;
use crate::host::BrowserHost;
use crate::ledger::{Activity, ActivityLedger};
use crate::models::BrowserEvent;
use crate::storage::KeyValueStore;
use log::{debug, error, info};
use session::next_heartbeat;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

pub struct Tracker<H, S> {
    host: H,
    ledger: ActivityLedger<S>,
    config: TrackerConfig,
    session: TrackingSession,
    media: MediaSignal,
}

impl<H: BrowserHost, S: KeyValueStore> Tracker<H, S> {
    pub fn new(host: H, store: S, config: TrackerConfig) -> Self {
        Self {
            host,
            ledger: ActivityLedger::new(store),
            config,
            session: TrackingSession::new(),
            media: MediaSignal::default(),
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn ledger(&self) -> &ActivityLedger<S> {
        &self.ledger
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(self.media.is_playing())
    }

    /// Make `domain` the accrual target.
    ///
    /// Any running interval is flushed under the previous domain first, then
    /// the decision is re-evaluated for the new one.
    pub async fn set_active_domain(&mut self, domain: Option<String>, tab_id: Option<i64>) {
        self.set_tracking(false).await;
        debug!("Active domain is now {domain:?} (tab {tab_id:?})");
        self.session.set_active(domain, tab_id);

        if self.session.active_domain.is_some() {
            self.reevaluate().await;
        }
    }

    /// Idempotent on/off transition.
    pub async fn set_tracking(&mut self, on: bool) {
        match (on, self.session.is_tracking()) {
            (true, false) => {
                let Some(domain) = self.session.active_domain() else {
                    debug!("No active domain, not starting tracking");
                    return;
                };
                info!("Starting tracking for {domain}");
                self.session.start(Instant::now(), self.config.heartbeat_interval());
            }
            (false, true) => {
                info!("Stopping tracking");
                self.session.cancel_heartbeat();
                self.flush().await;
                self.session.stop();
            }
            (true, true) | (false, false) => {}
        }
    }

    /// Move the whole seconds elapsed since the last checkpoint into the ledger.
    pub async fn flush(&mut self) {
        let now = Instant::now();
        let (Some(elapsed), Some(domain)) =
            (self.session.elapsed_secs(now), self.session.active_domain())
        else {
            return;
        };
        if elapsed == 0 {
            return;
        }

        match self.ledger.accrue(domain, elapsed).await {
            Ok(total) => debug!("Saved {elapsed}s for {domain} ({total}s total)"),
            // The interval is dropped rather than retried so it can never be counted twice
            Err(e) => error!("Failed to save {elapsed}s for {domain}: {e}"),
        }

        self.session.checkpoint = Some(now);
    }

    /// Recompute the tracking decision from fresh host state.
    pub async fn reevaluate(&mut self) {
        let signals = evaluator::sample_signals(
            &self.host,
            self.config.idle_threshold_secs,
            self.media.is_playing(),
        )
        .await;
        let on = signals.should_track();
        debug!(
            "Signals: idle={} focused={} media={} -> track={on}",
            signals.idle_state, signals.window_focused, signals.media_playing
        );
        self.set_tracking(on).await;
    }

    /// Empty the ledger; a running session restarts its interval from now.
    pub async fn reset_ledger(&mut self) -> Result<(), AppError> {
        self.ledger.reset().await?;
        if self.session.checkpoint.is_some() {
            self.session.checkpoint = Some(Instant::now());
        }
        info!("Website activity has been reset");
        Ok(())
    }

    /// Current totals including the interval accrued since the last heartbeat.
    pub async fn load_activity(&mut self) -> Result<Activity, AppError> {
        self.flush().await;
        self.ledger.load().await
    }

    /// Stop tracking and write out the final partial interval.
    pub async fn shutdown(&mut self) {
        self.set_tracking(false).await;
        info!("Tracker shut down");
    }

    /// Drive the tracker until shutdown is requested or every handle is dropped.
    pub async fn run(mut self, mut commands: mpsc::Receiver<TrackerCommand>) {
        self.init().await;

        loop {
            let wake = tokio::select! {
                command = commands.recv() => Wake::Command(command),
                () = next_heartbeat(&mut self.session.heartbeat) => Wake::Heartbeat,
            };

            match wake {
                Wake::Heartbeat => self.flush().await,
                Wake::Command(Some(TrackerCommand::Shutdown) | None) => break,
                Wake::Command(Some(command)) => self.handle_command(command).await,
            }
        }

        self.shutdown().await;
    }

    async fn handle_command(&mut self, command: TrackerCommand) {
        match command {
            TrackerCommand::Event(event) => self.on_event(event).await,
            TrackerCommand::ResetLedger { ack } => {
                let result = self.reset_ledger().await;
                if let Err(e) = &result {
                    error!("Failed to reset website activity: {e}");
                }
                let _ = ack.send(result);
            }
            TrackerCommand::LoadActivity { reply } => {
                let _ = reply.send(self.load_activity().await);
            }
            TrackerCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            TrackerCommand::Shutdown => {}
        }
    }
}

enum Wake {
    Command(Option<TrackerCommand>),
    Heartbeat,
}

/// Requests accepted by [`Tracker::run`].
#[derive(Debug)]
pub enum TrackerCommand {
    Event(BrowserEvent),
    ResetLedger { ack: oneshot::Sender<Result<(), AppError>> },
    LoadActivity { reply: oneshot::Sender<Result<Activity, AppError>> },
    Snapshot { reply: oneshot::Sender<SessionSnapshot> },
    Shutdown,
}

/// Cloneable sender side of a running tracker.
#[derive(Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<TrackerCommand>,
}

/// Create a handle and the receiver to pass to [`Tracker::run`].
pub fn channel() -> (TrackerHandle, mpsc::Receiver<TrackerCommand>) {
    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    (TrackerHandle { tx }, rx)
}

impl TrackerHandle {
    async fn send(&self, command: TrackerCommand) -> Result<(), AppError> {
        self.tx.send(command).await.map_err(|_| AppError::TrackerStopped)
    }

    pub async fn dispatch(&self, event: BrowserEvent) -> Result<(), AppError> {
        self.send(TrackerCommand::Event(event)).await
    }

    pub async fn reset_ledger(&self) -> Result<(), AppError> {
        let (ack, rx) = oneshot::channel();
        self.send(TrackerCommand::ResetLedger { ack }).await?;
        rx.await.map_err(|_| AppError::TrackerStopped)?
    }

    pub async fn load_activity(&self) -> Result<Activity, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(TrackerCommand::LoadActivity { reply }).await?;
        rx.await.map_err(|_| AppError::TrackerStopped)?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(TrackerCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| AppError::TrackerStopped)
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.send(TrackerCommand::Shutdown).await
    }
}
