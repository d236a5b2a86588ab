use axum::Json;
use serde_json::{json, Value};

/// Axum handler for `GET /`. Liveness check; not wrapped in the envelope.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "wow": "it works!" }))
}
