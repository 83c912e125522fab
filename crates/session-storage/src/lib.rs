//! Key-value session storage for the Sohwagi shell.
//!
//! The shell persists a handful of flat string values (identity fields,
//! backend tokens and the logged-out flag). This crate provides:
//! - [`KeyValueStorage`]: the backend trait, with atomic batch writes
//! - [`FileStorage`]: a JSON file backend, written via temp file + rename
//! - [`MemoryStorage`]: an in-process backend for tests and dry runs
//! - [`SessionStore`]: the typed API the orchestrator talks to

mod file;
mod keys;
mod memory;
mod store;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use store::{IdentityRecord, SessionStore, SessionTokens, StoredSession};
pub use traits::{KeyValueStorage, StorageOp};

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A stored value could not be interpreted
    #[error("Corrupt value for key {key}: {value}")]
    Corrupt { key: String, value: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
