//! In-process implementation of the interview services, backed by the LLM client.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::interview::error::InterviewError;
use crate::interview::identity::CandidateIdentity;
use crate::interview::questions::{EvaluationReport, Question};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::services::prompts::{
    EVALUATION_PROMPT_TEMPLATE, IDENTITY_PROMPT_TEMPLATE, NO_ANSWER, QUESTIONS_PROMPT,
};
use crate::services::{extraction, InterviewServices, ResumeUpload};

/// Only the head of a résumé is sent to the model.
pub const RESUME_TEXT_LIMIT: usize = 8000;

#[derive(Clone)]
pub struct LlmServices {
    llm: LlmClient,
}

impl LlmServices {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl InterviewServices for LlmServices {
    async fn extract_text(&self, upload: &ResumeUpload) -> Result<String, InterviewError> {
        extraction::extract_text(upload).await
    }

    async fn extract_identity(&self, resume_text: &str) -> Result<CandidateIdentity, InterviewError> {
        if resume_text.trim().is_empty() {
            return Err(InterviewError::Input(
                "No resume text was provided.".to_string(),
            ));
        }
        let prompt = IDENTITY_PROMPT_TEMPLATE.replace("{resume_text}", &resume_head(resume_text));
        self.llm
            .call_json::<CandidateIdentity>(&prompt, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| llm_failure("Identity extraction", e))
    }

    async fn generate_questions(&self) -> Result<Vec<Question>, InterviewError> {
        let questions = self
            .llm
            .call_json::<Vec<Question>>(QUESTIONS_PROMPT, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| llm_failure("Question generation", e))?;
        info!("Generated {} interview questions", questions.len());
        Ok(questions)
    }

    async fn evaluate(
        &self,
        questions: &[Question],
        answers: &[String],
    ) -> Result<EvaluationReport, InterviewError> {
        if questions.len() != answers.len() {
            return Err(InterviewError::Input(format!(
                "{} questions but {} answers",
                questions.len(),
                answers.len()
            )));
        }
        let prompt =
            EVALUATION_PROMPT_TEMPLATE.replace("{transcript}", &render_transcript(questions, answers));
        self.llm
            .call_json::<EvaluationReport>(&prompt, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| llm_failure("Evaluation", e))
    }
}

fn llm_failure(what: &str, err: LlmError) -> InterviewError {
    warn!("{what} failed: {err}");
    if err.is_malformed_reply() {
        InterviewError::Validation(format!("{what} returned an unusable reply: {err}"))
    } else {
        InterviewError::Transport(format!("{what} failed: {err}"))
    }
}

fn resume_head(text: &str) -> String {
    text.chars().take(RESUME_TEXT_LIMIT).collect()
}

/// `Question: ...\nAnswer: ...` blocks separated by blank lines.
pub fn render_transcript(questions: &[Question], answers: &[String]) -> String {
    questions
        .iter()
        .zip(answers)
        .map(|(q, a)| {
            let answer = if a.trim().is_empty() { NO_ANSWER } else { a.as_str() };
            format!("Question: {}\nAnswer: {}", q.text, answer)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::questions::{sample_questions, Difficulty};

    #[test]
    fn test_transcript_marks_blank_answers() {
        let questions = vec![
            Question::new("What is JSX?", Difficulty::Easy),
            Question::new("What is a Promise?", Difficulty::Easy),
        ];
        let answers = vec!["Syntax sugar for createElement".to_string(), "  ".to_string()];
        assert_eq!(
            render_transcript(&questions, &answers),
            "Question: What is JSX?\nAnswer: Syntax sugar for createElement\n\n\
             Question: What is a Promise?\nAnswer: No answer provided."
        );
    }

    #[test]
    fn test_resume_head_truncates_on_char_boundary() {
        let long = "é".repeat(RESUME_TEXT_LIMIT + 10);
        let head = resume_head(&long);
        assert_eq!(head.chars().count(), RESUME_TEXT_LIMIT);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_unequal_lengths_before_calling_model() {
        let services = LlmServices::new(LlmClient::new("test-key".to_string()));
        let err = services
            .evaluate(&sample_questions(), &["only one".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::Input(_)));
    }

    #[tokio::test]
    async fn test_blank_resume_text_is_input_error() {
        let services = LlmServices::new(LlmClient::new("test-key".to_string()));
        let err = services.extract_identity("   ").await.unwrap_err();
        assert!(matches!(err, InterviewError::Input(_)));
    }

    #[test]
    fn test_malformed_reply_maps_to_validation() {
        let parse_err = serde_json::from_str::<Vec<Question>>("nope").unwrap_err();
        let err = llm_failure("Question generation", LlmError::Parse(parse_err));
        assert!(matches!(err, InterviewError::Validation(_)));

        let err = llm_failure("Evaluation", LlmError::Exhausted { attempts: 3 });
        assert!(matches!(err, InterviewError::Transport(_)));
    }
}
