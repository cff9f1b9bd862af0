use super::{IdleState, MediaState, Tab, TabStatus};

/// Host notifications the tracker reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// A different tab became the foreground tab.
    TabActivated { tab_id: i64 },
    /// A tab changed; only a completed load of the active tab matters.
    TabUpdated { tab: Tab, status: TabStatus },
    /// A tab was closed.
    TabRemoved { tab_id: i64 },
    /// Focus moved to another window, or away from every window (`None`).
    WindowFocusChanged { window_id: Option<i64> },
    IdleStateChanged { state: IdleState },
    MediaPlayback { state: MediaState },
}
