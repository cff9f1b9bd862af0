use crate::host::BrowserHost;
use crate::models::{IdleState, SystemSignals};
use log::warn;

/// Query idle and focus state afresh and combine them with the media signal.
///
/// A failed query counts as idle or unfocused, so errors can only stop
/// tracking, never start it.
pub async fn sample_signals<H: BrowserHost>(
    host: &H,
    idle_threshold_secs: u64,
    media_playing: bool,
) -> SystemSignals {
    let idle_state = match host.idle_state(idle_threshold_secs).await {
        Ok(state) => state,
        Err(e) => {
            warn!("Idle state query failed, assuming idle: {e}");
            IdleState::Idle
        }
    };

    let window_focused = match host.window_focused().await {
        Ok(focused) => focused,
        Err(e) => {
            warn!("Window focus query failed, assuming unfocused: {e}");
            false
        }
    };

    SystemSignals {
        idle_state,
        window_focused,
        media_playing,
    }
}
