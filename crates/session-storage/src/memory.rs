//! In-memory storage backend.

use crate::{KeyValueStorage, StorageOp, StorageResult};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Volatile storage. Used by tests and by `--ephemeral` host runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn apply(&self, ops: &[StorageOp]) -> StorageResult<()> {
        let mut data = self.data.lock();
        for op in ops {
            match op {
                StorageOp::Set { key, value } => {
                    data.insert(key.clone(), value.clone());
                }
                StorageOp::Delete { key } => {
                    data.remove(key);
                }
            }
        }
        Ok(())
    }
}
