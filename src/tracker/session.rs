use serde::Serialize;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// In-memory state of the accrual engine.
///
/// `heartbeat` is `Some` exactly when `checkpoint` is `Some`; both are set
/// by [`TrackingSession::start`] and cleared by [`TrackingSession::stop`].
/// `active_domain` may stay set while tracking is off.
#[derive(Debug, Default)]
pub struct TrackingSession {
    pub(crate) active_domain: Option<String>,
    pub(crate) active_tab_id: Option<i64>,
    pub(crate) checkpoint: Option<Instant>,
    pub(crate) heartbeat: Option<Interval>,
}

impl TrackingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.heartbeat.is_some()
    }

    pub fn active_domain(&self) -> Option<&str> {
        self.active_domain.as_deref()
    }

    pub fn active_tab_id(&self) -> Option<i64> {
        self.active_tab_id
    }

    pub(crate) fn set_active(&mut self, domain: Option<String>, tab_id: Option<i64>) {
        self.active_domain = domain;
        self.active_tab_id = tab_id;
    }

    /// Checkpoint at `now` and schedule a heartbeat every `period`, first one a period from now.
    pub(crate) fn start(&mut self, now: Instant, period: Duration) {
        let mut heartbeat = interval_at(now + period, period);
        // After a suspension, resume the cadence instead of firing a burst of catch-up ticks
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.heartbeat = Some(heartbeat);
        self.checkpoint = Some(now);
    }

    pub(crate) fn cancel_heartbeat(&mut self) {
        self.heartbeat = None;
    }

    pub(crate) fn stop(&mut self) {
        self.heartbeat = None;
        self.checkpoint = None;
    }

    /// Whole seconds accrued since the last checkpoint.
    pub(crate) fn elapsed_secs(&self, now: Instant) -> Option<u64> {
        self.checkpoint
            .map(|checkpoint| now.saturating_duration_since(checkpoint).as_secs())
    }

    pub(crate) fn snapshot(&self, media_playing: bool) -> SessionSnapshot {
        SessionSnapshot {
            active_domain: self.active_domain.clone(),
            active_tab_id: self.active_tab_id,
            tracking: self.is_tracking(),
            media_playing,
        }
    }
}

/// Diagnostic view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub active_domain: Option<String>,
    pub active_tab_id: Option<i64>,
    pub tracking: bool,
    pub media_playing: bool,
}

/// Resolves on the next heartbeat tick; never resolves while tracking is off.
pub(crate) async fn next_heartbeat(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
