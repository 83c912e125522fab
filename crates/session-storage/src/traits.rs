//! Storage trait definitions.

use crate::StorageResult;

/// A single mutation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set { key: String, value: String },
    Delete { key: String },
}

impl StorageOp {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        StorageOp::Set {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn delete(key: &str) -> Self {
        StorageOp::Delete {
            key: key.to_string(),
        }
    }
}

/// Trait for key-value storage backends
pub trait KeyValueStorage: Send + Sync {
    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Apply every op or none of them. Readers never observe a partial batch.
    fn apply(&self, ops: &[StorageOp]) -> StorageResult<()>;

    /// Store a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.apply(&[StorageOp::set(key, value)])
    }

    /// Delete a value, returning whether it existed
    fn delete(&self, key: &str) -> StorageResult<bool> {
        let existed = self.has(key)?;
        self.apply(&[StorageOp::delete(key)])?;
        Ok(existed)
    }

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
