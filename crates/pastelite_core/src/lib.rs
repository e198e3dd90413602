//! Core domain library for Pastelite (config, record store, paste lifecycle).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Application error types (storage/domain).
pub mod error;
/// Paste creation and limit enforcement.
pub mod lifecycle;
/// Per-paste retrieval locks for strict view limits.
pub mod locks;
/// Data models for API requests and persistence.
pub mod models;
/// Paste identifier helpers.
pub mod naming;
/// Record store trait and backends.
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, StoreKind};
pub use constants::DEFAULT_PORT;
pub use error::AppError;
pub use lifecycle::{now_ms, PasteService};
pub use store::{open_store, MemoryStore, RecordStore, RedbStore};
