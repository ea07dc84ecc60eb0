use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::integrity::DisplayDirective;
use crate::interview::station::{RestoreChoice, StationView};
use crate::services::handlers::read_resume_upload;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FieldValue {
    pub value: String,
}

#[derive(Deserialize)]
pub struct AnswerText {
    pub text: String,
}

#[derive(Deserialize)]
pub struct DisplayReport {
    pub fullscreen: bool,
}

#[derive(Serialize)]
pub struct DisplayState {
    pub directive: DisplayDirective,
}

#[derive(Deserialize)]
pub struct RestoreRequest {
    pub choice: RestoreChoice,
}

/// GET /api/v1/interview
pub async fn handle_get_view(State(state): State<AppState>) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.view().await?))
}

/// POST /api/v1/interview/resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StationView>, AppError> {
    let upload = read_resume_upload(multipart).await?;
    Ok(Json(state.station.upload_resume(upload).await?))
}

/// POST /api/v1/interview/details
pub async fn handle_supply_field(
    State(state): State<AppState>,
    Json(req): Json<FieldValue>,
) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.supply_field(req.value).await?))
}

/// PUT /api/v1/interview/draft
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Json(req): Json<AnswerText>,
) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.update_draft(req.text).await?))
}

/// POST /api/v1/interview/answer
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerText>,
) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.submit_answer(req.text).await?))
}

/// POST /api/v1/interview/display
pub async fn handle_display_changed(
    State(state): State<AppState>,
    Json(req): Json<DisplayReport>,
) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.display_changed(req.fullscreen).await?))
}

/// GET /api/v1/interview/display
pub async fn handle_get_display(State(state): State<AppState>) -> Json<DisplayState> {
    Json(DisplayState {
        directive: *state.display.borrow(),
    })
}

/// POST /api/v1/interview/retry
pub async fn handle_retry(State(state): State<AppState>) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.retry().await?))
}

/// POST /api/v1/interview/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.reset().await?))
}

/// POST /api/v1/interview/restore
pub async fn handle_restore(
    State(state): State<AppState>,
    Json(req): Json<RestoreRequest>,
) -> Result<Json<StationView>, AppError> {
    Ok(Json(state.station.restore(req.choice).await?))
}
