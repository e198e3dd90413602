//! Liveness check.

use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Report whether the record store answers a ping.
///
/// Always responds 200; store failures only flip `ok` to `false`.
pub async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let ok = match state.pastes.store().ping() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("Record store ping failed: {}", err);
            false
        }
    };
    Json(json!({ "ok": ok }))
}
