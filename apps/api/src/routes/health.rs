use axum::Json;
use serde_json::{json, Value};

use crate::llm_client::models::{default_model, ModelInfo, MODEL_CATALOG};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "reactions-api"
    }))
}

/// GET /api/v1/models
pub async fn models_handler() -> Json<Value> {
    Json(json!({
        "default": default_model(),
        "models": MODEL_CATALOG.iter().copied().collect::<Vec<ModelInfo>>()
    }))
}
