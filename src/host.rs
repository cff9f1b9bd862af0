//! What the tracker needs to ask the browser.
//!
//! Every answer may already be stale when it arrives; callers re-query on
//! each evaluation instead of caching.

use crate::error::AppError;
use crate::models::{IdleState, Tab};

#[allow(async_fn_in_trait, reason = "hosts are driven from a single-threaded runtime")]
pub trait BrowserHost {
    /// The active tab of the focused window, if there is one.
    async fn active_tab(&self) -> Result<Option<Tab>, AppError>;

    /// Look up a tab by id; fails with `TabNotFound` once the tab is gone.
    async fn get_tab(&self, tab_id: i64) -> Result<Tab, AppError>;

    /// Whether the window owning the active tab currently has focus.
    async fn window_focused(&self) -> Result<bool, AppError>;

    /// Idle classification using `threshold_secs` of inactivity.
    async fn idle_state(&self, threshold_secs: u64) -> Result<IdleState, AppError>;
}
