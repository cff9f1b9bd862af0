pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod error;
pub mod host;
pub mod ledger;
pub mod models;
pub mod native_host;
pub mod platform;
pub mod report;
pub mod storage;
#[cfg(test)]
mod test_utils;
pub mod tracker;
pub mod validation;

use crate::config::Settings;
use crate::db::Database;
use crate::error::AppError;
use crate::native_host::{NativeBrowser, NativeHost};
use crate::platform::NativeIdleProbe;
use crate::storage::SqliteStore;
use crate::tracker::Tracker;
use log::{info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Open the ledger database at `path`, creating the schema on first use.
pub fn open_store(path: &Path) -> Result<SqliteStore, AppError> {
    let db = Database::open_migrated(path)?;
    Ok(SqliteStore::new(Arc::new(Mutex::new(db))))
}

/// Serve the browser extension over stdin/stdout until it disconnects.
pub async fn run_native_host(settings: Settings) -> Result<(), AppError> {
    let store = open_store(&settings.db_path)?;
    info!("Using database at {}", settings.db_path.display());

    let browser = NativeBrowser::new(Arc::new(NativeIdleProbe::new()));
    let (handle, rx) = tracker::channel();
    let mut host =
        NativeHost::new(tokio::io::stdin(), tokio::io::stdout(), browser.clone(), handle);

    if !host.handshake().await? {
        warn!("Extension disconnected before sending any state");
        return Ok(());
    }

    let tracker = Tracker::new(browser, store, settings.tracker);
    let ((), served) = tokio::join!(tracker.run(rx), host.run());
    served
}
