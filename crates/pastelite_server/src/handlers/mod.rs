//! HTTP request handlers.

/// Liveness endpoint.
pub mod health;
/// Paste creation, retrieval, and rendered view endpoints.
pub mod paste;
