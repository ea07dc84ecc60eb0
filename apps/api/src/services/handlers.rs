use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::interview::identity::CandidateIdentity;
use crate::interview::questions::{Evaluation, QuestionSet};
use crate::services::{
    EvaluateRequest, ExtractedText, GeneratedQuestions, ParseResumeRequest, ResumeUpload,
};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

/// Pulls the `resume` file part out of a multipart body.
pub async fn read_resume_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Input(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Input(format!("Failed to read upload: {e}")))?;
        debug!("Received {file_name} ({} bytes)", bytes.len());
        return Ok(ResumeUpload {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Input("No resume file uploaded.".to_string()))
}

/// POST /api/extractText
pub async fn handle_extract_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractedText>, AppError> {
    let upload = read_resume_upload(multipart).await?;
    let text = state.ai.extract_text(&upload).await?;
    Ok(Json(ExtractedText { text }))
}

/// POST /api/parseResume
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(req): Json<ParseResumeRequest>,
) -> Result<Json<CandidateIdentity>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Input("resumeText is required".to_string()));
    }
    let identity = state.ai.extract_identity(&req.resume_text).await?;
    Ok(Json(identity.normalized()))
}

/// POST /api/generateQuestions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
) -> Result<Json<GeneratedQuestions>, AppError> {
    let questions = state.ai.generate_questions().await?;
    let set = QuestionSet::validate(questions)?;
    Ok(Json(GeneratedQuestions {
        questions: set.into_inner(),
    }))
}

/// POST /api/evaluateInterview
pub async fn handle_evaluate_interview(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<Evaluation>, AppError> {
    if req.questions.is_empty() || req.questions.len() != req.answers.len() {
        return Err(AppError::Input(
            "questions and answers must be non-empty and the same length".to_string(),
        ));
    }
    let report = state.ai.evaluate(&req.questions, &req.answers).await?;
    Ok(Json(Evaluation::validate(report)?))
}
