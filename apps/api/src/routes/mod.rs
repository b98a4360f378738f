pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/match", post(handlers::handle_match))
        .route(
            "/api/v1/skills/extract",
            post(handlers::handle_extract_skills),
        )
        .route("/api/v1/skills", get(handlers::handle_list_skills))
        .with_state(state)
}
