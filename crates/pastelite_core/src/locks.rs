//! In-process per-paste view locks used by strict view-limit mode.

use crate::error::AppError;
use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard};

/// Serializes retrievals of the same paste id inside one process.
///
/// Ids only occupy the table while a retrieval is in flight, so the table
/// stays bounded by concurrency rather than by the number of pastes.
#[derive(Default)]
pub struct ViewLocks {
    in_flight: Mutex<HashSet<String>>,
    released: Condvar,
}

/// Guard holding exclusive retrieval rights for one paste id.
pub struct ViewGuard<'a> {
    locks: &'a ViewLocks,
    paste_id: String,
}

impl Drop for ViewGuard<'_> {
    fn drop(&mut self) {
        match self.locks.in_flight.lock() {
            Ok(mut in_flight) => {
                in_flight.remove(&self.paste_id);
            }
            Err(_) => {
                tracing::error!(
                    "Failed to release view lock for {}: lock table poisoned",
                    self.paste_id
                );
            }
        }
        self.locks.released.notify_all();
    }
}

fn poisoned() -> AppError {
    AppError::StorageMessage("Paste view lock table is unavailable.".to_string())
}

impl ViewLocks {
    fn state(&self) -> Result<MutexGuard<'_, HashSet<String>>, AppError> {
        self.in_flight.lock().map_err(|_| poisoned())
    }

    /// Block until no other retrieval holds `paste_id`, then take it.
    ///
    /// # Returns
    /// A guard that releases the id when dropped.
    ///
    /// # Errors
    /// Returns [`AppError::StorageMessage`] when the lock table is poisoned.
    pub fn acquire(&self, paste_id: &str) -> Result<ViewGuard<'_>, AppError> {
        let mut in_flight = self.state()?;
        while in_flight.contains(paste_id) {
            in_flight = self.released.wait(in_flight).map_err(|_| poisoned())?;
        }
        in_flight.insert(paste_id.to_string());
        Ok(ViewGuard {
            locks: self,
            paste_id: paste_id.to_string(),
        })
    }

    /// Number of ids currently held.
    ///
    /// # Errors
    /// Returns [`AppError::StorageMessage`] when the lock table is poisoned.
    pub fn held_count(&self) -> Result<usize, AppError> {
        Ok(self.state()?.len())
    }
}
