//! Shared constants used across Pastelite crates.

/// Default API port for Pastelite.
pub const DEFAULT_PORT: u16 = 38421;

/// Default maximum request body size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Length of generated paste identifiers.
pub const PASTE_ID_LEN: usize = 12;

/// Key prefix for paste records in the record store.
pub const PASTE_KEY_PREFIX: &str = "paste:";

/// Request header carrying a test-mode "current time" override in epoch millis.
pub const TEST_NOW_HEADER: &str = "x-test-now-ms";

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";
