//! Request-scoped "current time" resolution.

use axum::http::HeaderMap;
use pastelite_core::constants::TEST_NOW_HEADER;
use pastelite_core::now_ms;

/// Resolve the time used to evaluate paste limits for one request.
///
/// With `test_mode` enabled, an integer `x-test-now-ms` header overrides the
/// wall clock. Outside test mode the header is ignored entirely.
///
/// # Returns
/// Epoch milliseconds.
pub fn request_now_ms(headers: &HeaderMap, test_mode: bool) -> i64 {
    if test_mode {
        if let Some(value) = headers.get(TEST_NOW_HEADER) {
            match value.to_str().ok().and_then(|raw| raw.trim().parse::<i64>().ok()) {
                Some(override_ms) => return override_ms,
                None => tracing::debug!(
                    "Ignoring unparsable {} header: {:?}",
                    TEST_NOW_HEADER,
                    value
                ),
            }
        }
    }
    now_ms()
}
