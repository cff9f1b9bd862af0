//! Shared test utilities for sitetime.
//!
//! This module provides common setup functions used across test modules.

#![cfg(test)]

use crate::db::{migrations, Database};
use crate::error::AppError;
use crate::host::BrowserHost;
use crate::models::{IdleState, Tab};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::{tempdir, TempDir};

/// Create a temporary test database with migrations applied.
///
/// Returns a tuple of (Database, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_db() -> (Database, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection()).expect("Failed to run migrations on test DB");
    (db, dir)
}

struct FakeBrowser {
    tabs: HashMap<i64, Tab>,
    active_tab: Option<i64>,
    focused: bool,
    idle: IdleState,
    fail_queries: bool,
    idle_queries: usize,
}

/// Scriptable browser; clones share state so a test can steer a host the tracker owns.
#[derive(Clone)]
pub struct FakeHost {
    state: Arc<Mutex<FakeBrowser>>,
}

impl FakeHost {
    /// A focused window, an active user, and no tabs.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeBrowser {
                tabs: HashMap::new(),
                active_tab: None,
                focused: true,
                idle: IdleState::Active,
                fail_queries: false,
                idle_queries: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeBrowser> {
        self.state.lock().expect("FakeHost mutex poisoned")
    }

    /// Add `tab` and make it the active tab.
    pub fn open_tab(&self, tab: Tab) {
        let mut state = self.lock();
        state.active_tab = Some(tab.id);
        state.tabs.insert(tab.id, tab);
    }

    pub fn set_focused(&self, focused: bool) {
        self.lock().focused = focused;
    }

    pub fn set_idle(&self, idle: IdleState) {
        self.lock().idle = idle;
    }

    /// Make idle and focus queries fail.
    pub fn set_fail_queries(&self, fail: bool) {
        self.lock().fail_queries = fail;
    }

    /// Number of idle-state queries answered or failed so far.
    pub fn idle_queries(&self) -> usize {
        self.lock().idle_queries
    }
}

impl BrowserHost for FakeHost {
    async fn active_tab(&self) -> Result<Option<Tab>, AppError> {
        let state = self.lock();
        Ok(state.active_tab.and_then(|id| state.tabs.get(&id).cloned()))
    }

    async fn get_tab(&self, tab_id: i64) -> Result<Tab, AppError> {
        self.lock()
            .tabs
            .get(&tab_id)
            .cloned()
            .ok_or(AppError::TabNotFound { tab_id })
    }

    async fn window_focused(&self) -> Result<bool, AppError> {
        let state = self.lock();
        if state.fail_queries {
            return Err(AppError::Host("window query failed".into()));
        }
        Ok(state.focused)
    }

    async fn idle_state(&self, _threshold_secs: u64) -> Result<IdleState, AppError> {
        let mut state = self.lock();
        state.idle_queries += 1;
        if state.fail_queries {
            return Err(AppError::Host("idle query failed".into()));
        }
        Ok(state.idle)
    }
}
