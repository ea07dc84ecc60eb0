//! Test doubles shared by the station and route tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::interview::error::InterviewError;
use crate::interview::identity::CandidateIdentity;
use crate::interview::integrity::{DisplayError, DisplayHost};
use crate::interview::questions::{sample_questions, EvaluationReport, Question};
use crate::services::{InterviewServices, ResumeUpload};

#[derive(Default)]
pub struct StubServices {
    pub identity: CandidateIdentity,
    pub questions: Mutex<Vec<Question>>,
    pub fail_questions: AtomicBool,
    /// `None` makes every evaluation fail with a transport error.
    pub evaluation: Option<EvaluationReport>,
    /// When set, question generation waits for a permit before answering.
    pub question_gate: Option<Arc<Notify>>,
    pub question_calls: AtomicUsize,
    pub evaluation_calls: AtomicUsize,
    pub evaluated: Mutex<Option<(Vec<Question>, Vec<String>)>>,
}

impl StubServices {
    /// Full identity, a valid question set and a score of 82.
    pub fn complete() -> Self {
        Self {
            identity: full_identity(),
            questions: Mutex::new(sample_questions()),
            evaluation: Some(EvaluationReport {
                score: 82.0,
                summary: "Clear answers with good depth on React internals.".to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn with_identity(mut self, identity: CandidateIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn question_calls(&self) -> usize {
        self.question_calls.load(Ordering::SeqCst)
    }

    pub fn evaluation_calls(&self) -> usize {
        self.evaluation_calls.load(Ordering::SeqCst)
    }
}

pub fn full_identity() -> CandidateIdentity {
    CandidateIdentity {
        name: Some("Ada Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        phone: Some("555-0100".to_string()),
    }
}

#[async_trait]
impl InterviewServices for StubServices {
    async fn extract_text(&self, upload: &ResumeUpload) -> Result<String, InterviewError> {
        if upload.bytes.is_empty() {
            return Err(InterviewError::Input(
                "Could not extract any text from the document.".to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&upload.bytes).into_owned())
    }

    async fn extract_identity(&self, _resume_text: &str) -> Result<CandidateIdentity, InterviewError> {
        Ok(self.identity.clone())
    }

    async fn generate_questions(&self) -> Result<Vec<Question>, InterviewError> {
        self.question_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.question_gate {
            gate.notified().await;
        }
        if self.fail_questions.load(Ordering::SeqCst) {
            return Err(InterviewError::Transport("generator offline".to_string()));
        }
        Ok(self.questions.lock().unwrap().clone())
    }

    async fn evaluate(
        &self,
        questions: &[Question],
        answers: &[String],
    ) -> Result<EvaluationReport, InterviewError> {
        self.evaluation_calls.fetch_add(1, Ordering::SeqCst);
        *self.evaluated.lock().unwrap() = Some((questions.to_vec(), answers.to_vec()));
        self.evaluation
            .clone()
            .ok_or_else(|| InterviewError::Transport("evaluator offline".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub refuse: bool,
    pub requests: AtomicUsize,
    pub releases: AtomicUsize,
}

impl RecordingDisplay {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl DisplayHost for RecordingDisplay {
    fn request_fullscreen(&self) -> Result<(), DisplayError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(DisplayError::HostDetached);
        }
        Ok(())
    }

    fn release_fullscreen(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
