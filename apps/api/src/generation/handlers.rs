//! Axum route handlers for the Reactions API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::decoder::DecodedReactions;
use crate::generation::distribution::{allocate, EmotionDistribution, RatioPolicy};
use crate::generation::generator::{GenerateRequest, GenerationOutcome, MAX_COUNT, MIN_COUNT};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DistributionRequest {
    pub count: u32,
    #[serde(default)]
    pub ratios: Option<RatioPolicy>,
}

#[derive(Debug, Serialize)]
pub struct DistributionResponse {
    pub ratios: RatioPolicy,
    pub ratio_sum: u32,
    /// False means the allocation used the default split instead.
    pub balanced: bool,
    pub distribution: EmotionDistribution,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/distribution
///
/// Previews how `count` reactions would be split under the given ratios.
pub async fn handle_distribution(
    State(state): State<AppState>,
    Json(request): Json<DistributionRequest>,
) -> Result<Json<DistributionResponse>, AppError> {
    if !(MIN_COUNT..=MAX_COUNT).contains(&request.count) {
        return Err(AppError::Validation(format!(
            "count must be between {MIN_COUNT} and {MAX_COUNT}"
        )));
    }

    let ratios = request
        .ratios
        .unwrap_or(state.orchestrator.default_ratios());
    ratios.check_bounds().map_err(AppError::Validation)?;

    Ok(Json(DistributionResponse {
        ratios,
        ratio_sum: ratios.sum(),
        balanced: ratios.is_balanced(),
        distribution: allocate(request.count, ratios),
    }))
}

/// POST /api/v1/reactions/generate
///
/// Runs one generation. Returns 409 while another is in flight.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerationOutcome>, AppError> {
    let outcome = state.orchestrator.generate(request).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/reactions/export
///
/// Joins (possibly edited) buckets under their section headers.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(reactions): Json<DecodedReactions>,
) -> Result<Json<ExportResponse>, AppError> {
    Ok(Json(ExportResponse {
        text: reactions.export(state.orchestrator.markers()),
    }))
}
