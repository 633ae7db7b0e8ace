use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /healthz
pub async fn healthz_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// GET /prewarm
/// Forces the résumé index build so the first real question is not slowed by it.
pub async fn prewarm_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let index = state.index().await?;
    tracing::info!("Index warm: {} documents", index.documents().len());
    Ok(Json(json!({ "warmed": true })))
}
