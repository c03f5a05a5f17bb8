pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::programs::handlers as programs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(health::models_handler))
        // Program catalogue
        .route("/api/v1/programs", get(programs::handle_list_programs))
        .route("/api/v1/programs/:name", get(programs::handle_get_program))
        // Generation
        .route("/api/v1/distribution", post(generation::handle_distribution))
        .route(
            "/api/v1/reactions/generate",
            post(generation::handle_generate),
        )
        .route("/api/v1/reactions/export", post(generation::handle_export))
        .with_state(state)
}
