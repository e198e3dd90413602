//! Record store abstraction and its backends.
//!
//! The store is a flat, unordered string-keyed namespace of opaque byte
//! values. It offers no expiry, compare-and-swap, or multi-key transaction;
//! callers layering policy on top must tolerate lost updates.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::config::{Config, StoreKind};
use crate::error::AppError;
use std::sync::Arc;

/// Key-value persistence contract used by the paste lifecycle.
pub trait RecordStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Returns
    /// `Ok(None)` when the key is absent.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error when the write does not commit.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError>;

    /// Remove `key`.
    ///
    /// # Returns
    /// `Ok(true)` when a value was removed, `Ok(false)` when it was absent.
    ///
    /// # Errors
    /// Returns an error when the delete does not commit.
    fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Cheap reachability probe used by the liveness endpoint.
    ///
    /// # Errors
    /// Returns an error when the backend is unreachable.
    fn ping(&self) -> Result<(), AppError>;
}

/// Open the backend selected by `config.store`.
///
/// # Returns
/// A shared store handle for the lifetime of the process.
///
/// # Errors
/// Returns an error when the redb file cannot be created or opened.
pub fn open_store(config: &Config) -> Result<Arc<dyn RecordStore>, AppError> {
    match config.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory record store; pastes will not survive a restart");
            Ok(Arc::new(MemoryStore::default()))
        }
        StoreKind::Redb => Ok(Arc::new(RedbStore::open(&config.db_path)?)),
    }
}
