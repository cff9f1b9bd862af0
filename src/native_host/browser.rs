use super::protocol::IncomingMessage;
use crate::constants::WINDOW_ID_NONE;
use crate::error::AppError;
use crate::host::BrowserHost;
use crate::models::{BrowserEvent, IdleState, Tab};
use crate::platform::IdleProbe;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Latest browser state as pushed by the extension.
#[derive(Debug, Default)]
struct BrowserSnapshot {
    tabs: HashMap<i64, Tab>,
    active_tab: Option<i64>,
    focused_window: Option<i64>,
    reported_idle: Option<IdleState>,
}

impl BrowserSnapshot {
    fn remember(&mut self, tab: Tab) {
        self.tabs.insert(tab.id, tab);
    }

    fn focus(&mut self, window_id: Option<i64>) {
        self.focused_window = window_id.filter(|id| *id != WINDOW_ID_NONE);
    }

    fn active_tab(&self) -> Option<&Tab> {
        self.active_tab.and_then(|id| self.tabs.get(&id))
    }
}

/// [`BrowserHost`] backed by state the extension pushes over native messaging.
///
/// Incoming messages update the snapshot before the matching event reaches
/// the tracker, so tracker queries always see state at least as new as the
/// event that triggered them. Idle state prefers a fresh OS reading.
#[derive(Clone)]
pub struct NativeBrowser {
    snapshot: Arc<Mutex<BrowserSnapshot>>,
    probe: Arc<dyn IdleProbe>,
}

impl NativeBrowser {
    pub fn new(probe: Arc<dyn IdleProbe>) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(BrowserSnapshot::default())),
            probe,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrowserSnapshot> {
        match self.snapshot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("NativeBrowser: snapshot mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Fold `message` into the snapshot and return the tracker event it implies.
    pub fn apply(&self, message: &IncomingMessage) -> Option<BrowserEvent> {
        let mut snapshot = self.lock();
        match message {
            IncomingMessage::Hello { tab, focused_window_id, idle_state } => {
                snapshot.focus(*focused_window_id);
                if let Some(tab) = tab {
                    snapshot.active_tab = Some(tab.id);
                    snapshot.remember(tab.clone());
                }
                if idle_state.is_some() {
                    snapshot.reported_idle = *idle_state;
                }
                None
            }
            IncomingMessage::TabActivated { tab } => {
                snapshot.active_tab = Some(tab.id);
                snapshot.remember(tab.clone());
                Some(BrowserEvent::TabActivated { tab_id: tab.id })
            }
            IncomingMessage::TabUpdated { tab, status } => {
                let in_focused_window =
                    tab.window_id.is_none() || tab.window_id == snapshot.focused_window;
                if tab.active && (snapshot.active_tab == Some(tab.id) || in_focused_window) {
                    snapshot.active_tab = Some(tab.id);
                }
                let mut tab = tab.clone();
                tab.active = snapshot.active_tab == Some(tab.id);
                snapshot.remember(tab.clone());
                Some(BrowserEvent::TabUpdated { tab, status: *status })
            }
            IncomingMessage::TabRemoved { tab_id } => {
                snapshot.tabs.remove(tab_id);
                if snapshot.active_tab != Some(*tab_id) {
                    return None;
                }
                snapshot.active_tab = None;
                Some(BrowserEvent::TabRemoved { tab_id: *tab_id })
            }
            IncomingMessage::WindowFocusChanged { window_id } => {
                snapshot.focus(Some(*window_id));
                Some(BrowserEvent::WindowFocusChanged { window_id: snapshot.focused_window })
            }
            IncomingMessage::IdleStateChanged { state } => {
                snapshot.reported_idle = Some(*state);
                Some(BrowserEvent::IdleStateChanged { state: *state })
            }
            IncomingMessage::MediaPlaybackState { state } => {
                Some(BrowserEvent::MediaPlayback { state: *state })
            }
            IncomingMessage::GetActivity | IncomingMessage::ResetActivity => None,
        }
    }
}

impl BrowserHost for NativeBrowser {
    async fn active_tab(&self) -> Result<Option<Tab>, AppError> {
        Ok(self.lock().active_tab().cloned())
    }

    async fn get_tab(&self, tab_id: i64) -> Result<Tab, AppError> {
        self.lock()
            .tabs
            .get(&tab_id)
            .cloned()
            .ok_or(AppError::TabNotFound { tab_id })
    }

    async fn window_focused(&self) -> Result<bool, AppError> {
        let snapshot = self.lock();
        let Some(tab) = snapshot.active_tab() else {
            return Ok(false);
        };
        Ok(match (snapshot.focused_window, tab.window_id) {
            (None, _) => false,
            (Some(focused), Some(owner)) => focused == owner,
            // A known tab whose window was never reported counts for any focused window
            (Some(_), None) => true,
        })
    }

    async fn idle_state(&self, threshold_secs: u64) -> Result<IdleState, AppError> {
        let reported = self.lock().reported_idle;
        if reported == Some(IdleState::Locked) {
            return Ok(IdleState::Locked);
        }

        Ok(match self.probe.read_idle() {
            Some(reading) if reading.screen_locked => IdleState::Locked,
            Some(reading) => IdleState::from_idle_secs(reading.idle_secs, threshold_secs),
            // Without an OS reading, trust the browser; before its first report assume active
            None => reported.unwrap_or(IdleState::Active),
        })
    }
}
