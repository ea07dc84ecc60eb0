// AI-backed interview services: text extraction, identity extraction,
// question generation and transcript evaluation.
// The station consumes them through `InterviewServices`; this process also
// serves them over HTTP for remote stations.

pub mod extraction;
pub mod handlers;
pub mod http_backend;
pub mod llm_backend;
pub mod prompts;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::interview::error::InterviewError;
use crate::interview::identity::CandidateIdentity;
use crate::interview::questions::{EvaluationReport, Question};

/// An uploaded résumé file, as received from the browser.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// `POST /api/extractText` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
}

/// `POST /api/parseResume` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    #[serde(default)]
    pub resume_text: String,
}

/// `POST /api/generateQuestions` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestions {
    pub questions: Vec<Question>,
}

/// `POST /api/evaluateInterview` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub questions: Vec<Question>,
    pub answers: Vec<String>,
}

/// The external collaborators of the interview station.
///
/// Implementations return the service's answer as-is; shape and range
/// validation happens in the station, so a malformed reply never reaches the
/// session.
#[async_trait]
pub trait InterviewServices: Send + Sync {
    async fn extract_text(&self, upload: &ResumeUpload) -> Result<String, InterviewError>;

    async fn extract_identity(&self, resume_text: &str) -> Result<CandidateIdentity, InterviewError>;

    async fn generate_questions(&self) -> Result<Vec<Question>, InterviewError>;

    async fn evaluate(
        &self,
        questions: &[Question],
        answers: &[String],
    ) -> Result<EvaluationReport, InterviewError>;
}
