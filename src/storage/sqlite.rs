use super::KeyValueStore;
use crate::db::{with_connection, Database};
use crate::error::AppError;
use rusqlite::{params, OptionalExtension};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

/// Key-value store persisted as JSON text in SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, AppError> {
        let raw: Vec<(String, String)> = with_connection(&self.db, "read storage", |conn| {
            let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
            let mut found = Vec::with_capacity(keys.len());
            for key in keys {
                let value: Option<String> = stmt.query_row([key], |row| row.get(0)).optional()?;
                if let Some(value) = value {
                    found.push(((*key).to_string(), value));
                }
            }
            Ok(found)
        })?;

        let mut result = Map::new();
        for (key, value) in raw {
            result.insert(key, serde_json::from_str(&value)?);
        }
        Ok(result)
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), AppError> {
        let encoded: Vec<(String, String)> = items
            .into_iter()
            .map(|(key, value)| serde_json::to_string(&value).map(|text| (key, text)))
            .collect::<Result<_, _>>()?;

        with_connection(&self.db, "write storage", |conn| {
            let tx = conn.unchecked_transaction()?;
            for (key, value) in &encoded {
                tx.execute(
                    "INSERT INTO kv_store (key, value, updated_at)
                     VALUES (?1, ?2, strftime('%s', 'now'))
                     ON CONFLICT(key) DO UPDATE
                     SET value = excluded.value, updated_at = excluded.updated_at",
                    params![key, value],
                )?;
            }
            tx.commit()
        })
    }
}
