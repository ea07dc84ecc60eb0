use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::roster::{RosterEntry, TriageStatus};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TriageUpdate {
    pub status: TriageStatus,
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    Ok(Json(state.station.roster().await?))
}

/// PATCH /api/v1/candidates/:id/status
pub async fn handle_set_triage_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TriageUpdate>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    Ok(Json(state.station.set_triage_status(id, req.status).await?))
}

/// DELETE /api/v1/candidates
pub async fn handle_clear_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    Ok(Json(state.station.clear_roster().await?))
}
