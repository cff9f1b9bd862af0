// src/db/helpers.rs

use crate::db::Database;
use crate::error::AppError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Execute a database operation with lock recovery and error logging.
///
/// # Example
/// ```ignore
/// with_connection(&db, "read activity", |conn| {
///     conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
/// })
/// ```
pub fn with_connection<F, T>(
    db: &Arc<Mutex<Database>>,
    operation: &str,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<T>,
{
    let db = match db.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Database mutex was poisoned during {operation}, recovering");
            poisoned.into_inner()
        }
    };

    f(db.connection()).map_err(|e| {
        log::error!("Failed to {operation}: {e}");
        AppError::Database(e)
    })
}
