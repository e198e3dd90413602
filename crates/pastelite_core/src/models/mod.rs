//! Data models for API payloads and persistence.

/// Paste records and request/response shapes.
pub mod paste;
