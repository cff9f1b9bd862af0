use super::KeyValueStore;
use crate::error::AppError;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-process store; clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<Map<String, Value>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("MemoryStore: mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent `set` calls fail, simulating an unavailable backend.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, AppError> {
        let items = self.lock();
        Ok(keys
            .iter()
            .filter_map(|key| items.get(*key).map(|v| ((*key).to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Io(std::io::Error::other("storage unavailable")));
        }
        self.lock().extend(items);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
