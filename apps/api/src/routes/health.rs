use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and what the engine was built with.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let embedder = state.engine.embedder();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screener",
        "embedding_model": embedder.model_name(),
        "embedding_dims": embedder.dims(),
        "vocabulary_size": state.engine.vocabulary().len()
    }))
}
