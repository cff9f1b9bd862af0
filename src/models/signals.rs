use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-reported user activity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

impl IdleState {
    /// Classify a measured input-inactivity duration against a threshold.
    pub fn from_idle_secs(idle_secs: u64, threshold_secs: u64) -> Self {
        if idle_secs >= threshold_secs {
            IdleState::Idle
        } else {
            IdleState::Active
        }
    }
}

impl fmt::Display for IdleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdleState::Active => "active",
            IdleState::Idle => "idle",
            IdleState::Locked => "locked",
        };
        f.write_str(s)
    }
}

/// Playback state sent by the in-page media observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaState {
    Playing,
    Paused,
}

impl MediaState {
    pub fn is_playing(self) -> bool {
        matches!(self, MediaState::Playing)
    }
}

/// The three inputs of the tracking decision, sampled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemSignals {
    pub idle_state: IdleState,
    pub window_focused: bool,
    pub media_playing: bool,
}

impl SystemSignals {
    /// Active input in a focused window, or media playing regardless of input.
    pub fn should_track(&self) -> bool {
        (self.idle_state == IdleState::Active && self.window_focused) || self.media_playing
    }
}
