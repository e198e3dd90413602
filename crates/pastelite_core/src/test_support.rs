//! Shared test-only helpers for pastelite_core.

use crate::error::AppError;
use crate::store::{MemoryStore, RecordStore};
use std::sync::atomic::{AtomicBool, Ordering};

/// Store whose operations can be switched to fail, wrapping a [`MemoryStore`].
#[derive(Default)]
pub(crate) struct FaultyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FaultyStore {
    pub(crate) fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), AppError> {
        if flag.load(Ordering::SeqCst) {
            return Err(AppError::StorageMessage(format!("injected {} failure", op)));
        }
        Ok(())
    }
}

impl RecordStore for FaultyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool, AppError> {
        Self::check(&self.fail_writes, "delete")?;
        self.inner.delete(key)
    }

    fn ping(&self) -> Result<(), AppError> {
        Self::check(&self.fail_reads, "ping")?;
        self.inner.ping()
    }
}
