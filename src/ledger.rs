//! Durable per-domain totals of tracked seconds.
//!
//! The whole mapping lives under a single storage key and every update is a
//! read-modify-write of that mapping. Callers must not run two updates at the
//! same time; the tracker run loop is the only writer while it is running.

use crate::constants::LEDGER_KEY;
use crate::error::AppError;
use crate::storage::KeyValueStore;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Domain -> accumulated seconds.
pub type Activity = BTreeMap<String, u64>;

pub struct ActivityLedger<S> {
    store: S,
}

impl<S: KeyValueStore> ActivityLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the current mapping; a ledger that was never written is empty.
    pub async fn load(&self) -> Result<Activity, AppError> {
        let mut stored = self.store.get(&[LEDGER_KEY]).await?;
        match stored.remove(LEDGER_KEY) {
            Some(value) => decode(value),
            None => Ok(Activity::new()),
        }
    }

    /// Add `secs` to `domain` and return the domain's new total.
    pub async fn accrue(&self, domain: &str, secs: u64) -> Result<u64, AppError> {
        let mut activity = self.load().await?;
        let total = activity.entry(domain.to_string()).or_insert(0);
        *total = total.saturating_add(secs);
        let total = *total;
        self.write(&activity).await?;
        Ok(total)
    }

    /// Replace the mapping with an empty one.
    pub async fn reset(&self) -> Result<(), AppError> {
        self.write(&Activity::new()).await
    }

    async fn write(&self, activity: &Activity) -> Result<(), AppError> {
        let mut items = Map::new();
        items.insert(LEDGER_KEY.to_string(), serde_json::to_value(activity)?);
        self.store.set(items).await
    }
}

fn decode(value: Value) -> Result<Activity, AppError> {
    let entries = match value {
        Value::Null => return Ok(Activity::new()),
        Value::Object(entries) => entries,
        other => {
            return Err(AppError::CorruptLedger {
                reason: format!("expected an object, found {other}"),
            })
        }
    };

    entries
        .into_iter()
        .map(|(domain, secs)| match secs.as_u64() {
            Some(secs) => Ok((domain, secs)),
            None => Err(AppError::CorruptLedger {
                reason: format!("'{domain}' has non-integer total {secs}"),
            }),
        })
        .collect()
}
