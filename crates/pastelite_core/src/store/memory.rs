//! Process-local record store.

use super::RecordStore;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Record store backed by a `HashMap` behind an `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>, AppError> {
        self.inner
            .read()
            .map_err(|_| AppError::StorageMessage("memory store lock is poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>, AppError> {
        self.inner
            .write()
            .map_err(|_| AppError::StorageMessage("memory store lock is poisoned".to_string()))
    }

    /// Number of stored keys.
    ///
    /// # Errors
    /// Returns an error when the lock is poisoned.
    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.read()?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    /// Returns an error when the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.read()?.is_empty())
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        self.write()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.write()?.remove(key).is_some())
    }

    fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
