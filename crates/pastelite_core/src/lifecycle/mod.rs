//! Paste lifecycle: creation, retrieval with side effects, and lazy eviction.
//!
//! Enforcement happens only on read. Every retrieval re-evaluates the time and
//! view limits against the caller-supplied `now_ms`; a record that violates
//! either is deleted by the same call that notices it. Nothing sweeps expired
//! records in the background, so an expired paste that is never requested
//! again stays in the store.
//!
//! The read-increment-write sequence is not atomic. Two concurrent retrievals
//! of a `max_views = 1` paste can both pass the limit check and both be served.
//! The post-increment re-check narrows that window without closing it; strict
//! mode ([`PasteService::with_strict_view_limits`]) closes it for callers that
//! share one [`PasteService`].

use crate::config::Config;
use crate::error::AppError;
use crate::locks::{ViewGuard, ViewLocks};
use crate::models::paste::{NewPaste, PasteRecord, PasteView};
use crate::naming::{generate_id, paste_key};
use crate::store::RecordStore;
use chrono::Utc;
use std::sync::Arc;

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Creates pastes and enforces their limits on retrieval.
pub struct PasteService {
    store: Arc<dyn RecordStore>,
    view_locks: Option<ViewLocks>,
}

impl PasteService {
    /// Build a service with best-effort view counting.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            view_locks: None,
        }
    }

    /// Build a service that serializes retrievals of the same id.
    ///
    /// Only retrievals routed through this instance are serialized; other
    /// processes sharing the store can still over-serve.
    pub fn with_strict_view_limits(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            view_locks: Some(ViewLocks::default()),
        }
    }

    /// Build a service honoring `config.strict_view_limits`.
    pub fn from_config(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        if config.strict_view_limits {
            Self::with_strict_view_limits(store)
        } else {
            Self::new(store)
        }
    }

    /// Underlying record store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Persist a new paste created now.
    ///
    /// # Returns
    /// The generated paste id.
    ///
    /// # Errors
    /// Returns an error when serialization or the store write fails.
    pub fn create(&self, paste: NewPaste) -> Result<String, AppError> {
        self.create_at(paste, now_ms())
    }

    /// Persist a new paste with an explicit creation time.
    ///
    /// # Arguments
    /// - `paste`: Validated content and limits.
    /// - `created_at_ms`: Creation time in epoch milliseconds.
    ///
    /// # Returns
    /// The generated paste id.
    ///
    /// # Errors
    /// Returns an error when serialization or the store write fails.
    pub fn create_at(&self, paste: NewPaste, created_at_ms: i64) -> Result<String, AppError> {
        let id = generate_id();
        let record = PasteRecord::new(id.clone(), paste, created_at_ms);
        self.store.set(&paste_key(&id), &encode(&record)?)?;
        tracing::info!(
            paste_id = %id,
            ttl_seconds = ?record.ttl_seconds,
            max_views = ?record.max_views,
            "Created paste"
        );
        Ok(id)
    }

    /// Retrieve a paste and its derived limits, counting one view.
    ///
    /// # Arguments
    /// - `id`: Paste id.
    /// - `now_ms`: Current time in epoch milliseconds.
    ///
    /// # Returns
    /// `Ok(None)` when the paste is missing, expired, or out of views.
    ///
    /// # Errors
    /// Returns an error when the store fails or the stored value is malformed.
    pub fn retrieve(&self, id: &str, now_ms: i64) -> Result<Option<PasteView>, AppError> {
        Ok(self
            .consume_view(id, now_ms)?
            .map(|record| PasteView::from(&record)))
    }

    /// Retrieve only the paste content, counting one view.
    ///
    /// Enforcement is identical to [`PasteService::retrieve`].
    ///
    /// # Errors
    /// Returns an error when the store fails or the stored value is malformed.
    pub fn retrieve_content(&self, id: &str, now_ms: i64) -> Result<Option<String>, AppError> {
        Ok(self.consume_view(id, now_ms)?.map(|record| record.content))
    }

    fn lock_view(&self, id: &str) -> Result<Option<ViewGuard<'_>>, AppError> {
        self.view_locks
            .as_ref()
            .map(|locks| locks.acquire(id))
            .transpose()
    }

    fn consume_view(&self, id: &str, now_ms: i64) -> Result<Option<PasteRecord>, AppError> {
        let _view_guard = self.lock_view(id)?;
        let key = paste_key(id);

        let Some(stored) = self.store.get(&key)? else {
            return Ok(None);
        };
        let mut record = decode(&stored)?;

        if record.is_expired_at(now_ms) {
            self.evict(&key, id, "expired")?;
            return Ok(None);
        }

        if record.views_exhausted() {
            self.evict(&key, id, "view limit reached")?;
            return Ok(None);
        }

        record.current_views = record.current_views.saturating_add(1);
        self.store.set(&key, &encode(&record)?)?;

        // Re-check after the increment; a stale read must not serve past the limit.
        if record.views_overrun() {
            self.evict(&key, id, "view limit overrun")?;
            return Ok(None);
        }

        Ok(Some(record))
    }

    fn evict(&self, key: &str, id: &str, reason: &'static str) -> Result<(), AppError> {
        let removed = self.store.delete(key)?;
        tracing::debug!(paste_id = %id, reason, removed, "Evicted paste");
        Ok(())
    }
}

fn encode(record: &PasteRecord) -> Result<Vec<u8>, AppError> {
    Ok(bincode::serialize(record)?)
}

fn decode(bytes: &[u8]) -> Result<PasteRecord, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

#[cfg(test)]
mod tests;
