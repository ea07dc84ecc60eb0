//! Interview services consumed from a remote deployment of the service endpoints.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::warn;

use crate::interview::error::InterviewError;
use crate::interview::identity::CandidateIdentity;
use crate::interview::questions::{EvaluationReport, Question};
use crate::services::{
    EvaluateRequest, ExtractedText, GeneratedQuestions, InterviewServices, ParseResumeRequest,
    ResumeUpload,
};

const REQUEST_TIMEOUT_SECS: u64 = 180;
/// Error code the service endpoints use for an unusable model reply.
const UPSTREAM_VALIDATION_ERROR: &str = "UPSTREAM_VALIDATION_ERROR";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    message: String,
}

#[derive(Clone)]
pub struct HttpServices {
    client: Client,
    base_url: String,
}

impl HttpServices {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {e}");
                Client::new()
            });
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Passes 2xx responses through; anything else becomes an error.
async fn checked(response: Response) -> Result<Response, InterviewError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let raw = response.text().await.unwrap_or_default();
    Err(failure(status, &raw))
}

/// 4xx is the caller's input. A relayed validation failure stays a
/// validation failure; every other error is transport.
fn failure(status: StatusCode, raw: &str) -> InterviewError {
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(raw) {
        Ok(envelope) => (envelope.error.code, envelope.error.message),
        Err(_) => (String::new(), raw.to_string()),
    };
    if status.is_client_error() {
        InterviewError::Input(message)
    } else if code == UPSTREAM_VALIDATION_ERROR {
        InterviewError::Validation(message)
    } else {
        InterviewError::Transport(format!("service returned {status}: {message}"))
    }
}

#[async_trait]
impl InterviewServices for HttpServices {
    async fn extract_text(&self, upload: &ResumeUpload) -> Result<String, InterviewError> {
        let mut part = Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| InterviewError::Input(format!("Bad content type: {e}")))?;
        }
        let response = self
            .client
            .post(self.url("/api/extractText"))
            .multipart(Form::new().part("resume", part))
            .send()
            .await?;
        let body: ExtractedText = checked(response).await?.json().await?;
        Ok(body.text)
    }

    async fn extract_identity(&self, resume_text: &str) -> Result<CandidateIdentity, InterviewError> {
        let response = self
            .client
            .post(self.url("/api/parseResume"))
            .json(&ParseResumeRequest {
                resume_text: resume_text.to_string(),
            })
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }

    async fn generate_questions(&self) -> Result<Vec<Question>, InterviewError> {
        let response = self
            .client
            .post(self.url("/api/generateQuestions"))
            .send()
            .await?;
        let body: GeneratedQuestions = checked(response).await?.json().await?;
        Ok(body.questions)
    }

    async fn evaluate(
        &self,
        questions: &[Question],
        answers: &[String],
    ) -> Result<EvaluationReport, InterviewError> {
        let response = self
            .client
            .post(self.url("/api/evaluateInterview"))
            .json(&EvaluateRequest {
                questions: questions.to_vec(),
                answers: answers.to_vec(),
            })
            .send()
            .await?;
        Ok(checked(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let services = HttpServices::new("http://interview.local/");
        assert_eq!(
            services.url("/api/parseResume"),
            "http://interview.local/api/parseResume"
        );
    }

    #[test]
    fn test_parse_resume_request_is_camel_case() {
        let body = serde_json::to_value(ParseResumeRequest {
            resume_text: "Ada".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "resumeText": "Ada" }));
    }

    #[test]
    fn test_relayed_validation_error_keeps_its_kind() {
        let raw = r#"{"error": {"code": "UPSTREAM_VALIDATION_ERROR", "message": "expected 6 questions, got 5"}}"#;
        let err = failure(StatusCode::BAD_GATEWAY, raw);
        assert!(matches!(err, InterviewError::Validation(msg) if msg.contains("expected 6")));

        let raw = r#"{"error": {"code": "UPSTREAM_ERROR", "message": "model overloaded"}}"#;
        assert!(matches!(
            failure(StatusCode::BAD_GATEWAY, raw),
            InterviewError::Transport(_)
        ));
    }

    #[test]
    fn test_client_errors_are_input_errors() {
        let raw = r#"{"error": {"code": "INPUT_ERROR", "message": "resumeText is required"}}"#;
        assert!(matches!(
            failure(StatusCode::BAD_REQUEST, raw),
            InterviewError::Input(msg) if msg == "resumeText is required"
        ));
        assert!(matches!(
            failure(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            InterviewError::Transport(msg) if msg.contains("oops")
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let services = HttpServices::new("http://127.0.0.1:9");
        let err = services.generate_questions().await.unwrap_err();
        assert!(matches!(err, InterviewError::Transport(_)));
    }
}
