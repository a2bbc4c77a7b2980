use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": env!("CARGO_PKG_NAME") }))
}
