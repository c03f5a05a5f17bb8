//! Axum route handlers for the program catalogue.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::programs::ProgramSummary;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProgramQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgramListResponse {
    pub programs: Vec<String>,
    pub total: usize,
}

/// GET /api/v1/programs?q=
pub async fn handle_list_programs(
    State(state): State<AppState>,
    Query(params): Query<ProgramQuery>,
) -> Json<ProgramListResponse> {
    let programs: Vec<String> = state
        .programs
        .search(params.q.as_deref().unwrap_or_default())
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(ProgramListResponse {
        total: programs.len(),
        programs,
    })
}

/// GET /api/v1/programs/:name
pub async fn handle_get_program(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProgramSummary>, AppError> {
    state
        .programs
        .summary(&name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Program '{name}' not found")))
}
