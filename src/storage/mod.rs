//! Durable key-value storage behind the activity ledger.
//!
//! The contract mirrors browser extension storage: `get` returns only the
//! keys that exist, `set` upserts every entry it is given, and there are
//! no transactions across calls.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::AppError;
use serde_json::{Map, Value};

#[allow(async_fn_in_trait, reason = "stores are driven from a single-threaded runtime")]
pub trait KeyValueStore {
    /// Fetch the given keys; absent keys are omitted from the result.
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, AppError>;

    /// Write every entry of `items`, replacing existing values.
    async fn set(&self, items: Map<String, Value>) -> Result<(), AppError>;
}
