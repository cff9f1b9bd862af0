use crate::ledger::Activity;
use crate::models::{IdleState, MediaState, Tab, TabStatus};
use crate::report::ActivityReport;
use serde::{Deserialize, Serialize};

/// Messages sent by the extension's background and content scripts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum IncomingMessage {
    /// Browser state at connection time; expected as the first message.
    #[serde(rename = "hello")]
    Hello {
        #[serde(default)]
        tab: Option<Tab>,
        #[serde(default, rename = "focusedWindowId")]
        focused_window_id: Option<i64>,
        #[serde(default, rename = "idleState")]
        idle_state: Option<IdleState>,
    },
    #[serde(rename = "tab_activated")]
    TabActivated { tab: Tab },
    #[serde(rename = "tab_updated")]
    TabUpdated { tab: Tab, status: TabStatus },
    #[serde(rename = "tab_removed")]
    TabRemoved {
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    #[serde(rename = "window_focus_changed")]
    WindowFocusChanged {
        #[serde(rename = "windowId")]
        window_id: i64,
    },
    #[serde(rename = "idle_state_changed")]
    IdleStateChanged { state: IdleState },
    #[serde(rename = "MEDIA_PLAYBACK_STATE")]
    MediaPlaybackState { state: MediaState },
    #[serde(rename = "get_activity")]
    GetActivity,
    #[serde(rename = "reset_activity")]
    ResetActivity,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    #[serde(rename = "activity")]
    Activity {
        #[serde(rename = "websiteActivity")]
        website_activity: Activity,
        report: ActivityReport,
    },
    #[serde(rename = "reset_done")]
    ResetDone,
    #[serde(rename = "error")]
    Error { message: String },
}
