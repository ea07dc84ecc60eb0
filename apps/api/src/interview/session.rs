//! Session State Machine: the interview aggregate and its reducer.
//!
//! Pure state and transitions, no I/O. Every mutation goes through
//! [`InterviewSession::apply`]; an event that does not fit the current status
//! is rejected and leaves the aggregate untouched.
//!
//! ```text
//! NotStarted ─► Gathering ─► Ready ─► InProgress ─► Evaluating ─► Completed
//!      └──────────────────────►┘          ⟲ answer
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::interview::identity::{CandidateIdentity, Classification, Field};
use crate::interview::questions::{Evaluation, Question, QuestionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    Gathering,
    Ready,
    InProgress,
    Evaluating,
    Completed,
}

impl SessionStatus {
    /// Statuses a restarted process must ask about before continuing.
    pub fn is_resumable(self) -> bool {
        matches!(
            self,
            SessionStatus::Gathering
                | SessionStatus::Ready
                | SessionStatus::InProgress
                | SessionStatus::Evaluating
        )
    }
}

/// Named transitions of the session. Reset is not an event: it replaces the
/// aggregate with [`InterviewSession::new`].
#[derive(Debug, Clone)]
pub enum SessionEvent {
    IdentityResolved(CandidateIdentity),
    FieldSupplied(String),
    QuestionsReceived(QuestionSet),
    AnswerSubmitted(String),
    EvaluationReceived(Evaluation),
    Persisted,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::IdentityResolved(_) => "identity_resolved",
            SessionEvent::FieldSupplied(_) => "field_supplied",
            SessionEvent::QuestionsReceived(_) => "questions_received",
            SessionEvent::AnswerSubmitted(_) => "answer_submitted",
            SessionEvent::EvaluationReceived(_) => "evaluation_received",
            SessionEvent::Persisted => "persisted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{event} is not accepted while {status:?}")]
    NotAccepted {
        status: SessionStatus,
        event: &'static str,
    },

    #[error("{0} cannot be blank")]
    BlankValue(Field),

    #[error("session has already been saved to the roster")]
    AlreadyPersisted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSession {
    /// Distinguishes this instance from every session before and after it.
    epoch: Uuid,
    status: SessionStatus,
    candidate: CandidateIdentity,
    questions: Vec<Question>,
    answers: Vec<String>,
    current_question_index: usize,
    score: Option<u8>,
    summary: Option<String>,
    persisted: bool,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            epoch: Uuid::new_v4(),
            status: SessionStatus::NotStarted,
            candidate: CandidateIdentity::default(),
            questions: Vec::new(),
            answers: Vec::new(),
            current_question_index: 0,
            score: None,
            summary: None,
            persisted: false,
        }
    }

    pub fn epoch(&self) -> Uuid {
        self.epoch
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn candidate(&self) -> &CandidateIdentity {
        &self.candidate
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.status {
            SessionStatus::InProgress => self.questions.get(self.current_question_index),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<u8> {
        self.score
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn persisted(&self) -> bool {
        self.persisted
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<(), TransitionError> {
        use SessionStatus::*;

        let not_accepted = TransitionError::NotAccepted {
            status: self.status,
            event: event.name(),
        };

        match (self.status, event) {
            (NotStarted, SessionEvent::IdentityResolved(identity)) => {
                self.candidate.merge(identity);
                self.status = self.classified();
            }

            (Gathering, SessionEvent::FieldSupplied(value)) => {
                let Classification::Missing(field) = self.candidate.classify() else {
                    return Err(not_accepted);
                };
                self.candidate
                    .supply(field, &value)
                    .map_err(|blank| TransitionError::BlankValue(blank.0))?;
                self.status = self.classified();
            }

            (Ready, SessionEvent::QuestionsReceived(set)) => {
                self.questions = set.into_inner();
                self.answers.clear();
                self.current_question_index = 0;
                self.status = InProgress;
            }

            (InProgress, SessionEvent::AnswerSubmitted(answer)) => {
                self.answers.push(answer);
                if self.current_question_index + 1 < self.questions.len() {
                    self.current_question_index += 1;
                } else {
                    self.status = Evaluating;
                }
            }

            (Evaluating, SessionEvent::EvaluationReceived(evaluation)) => {
                self.score = Some(evaluation.score);
                self.summary = Some(evaluation.summary);
                self.status = Completed;
            }

            (Completed, SessionEvent::Persisted) => {
                if self.persisted {
                    return Err(TransitionError::AlreadyPersisted);
                }
                self.persisted = true;
            }

            _ => return Err(not_accepted),
        }

        debug_assert!(self.answers.len() <= self.questions.len());
        debug_assert!(self.current_question_index <= self.questions.len());
        Ok(())
    }

    fn classified(&self) -> SessionStatus {
        match self.candidate.classify() {
            Classification::Complete => SessionStatus::Ready,
            Classification::Missing(_) => SessionStatus::Gathering,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::questions::sample_questions;

    fn identity(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> CandidateIdentity {
        CandidateIdentity {
            name: name.map(String::from),
            email: email.map(String::from),
            phone: phone.map(String::from),
        }
    }

    fn in_progress() -> InterviewSession {
        let mut session = InterviewSession::new();
        session
            .apply(SessionEvent::IdentityResolved(identity(
                Some("Ada"),
                Some("ada@example.com"),
                Some("555-0100"),
            )))
            .unwrap();
        let set = QuestionSet::validate(sample_questions()).unwrap();
        session.apply(SessionEvent::QuestionsReceived(set)).unwrap();
        session
    }

    fn completed() -> InterviewSession {
        let mut session = in_progress();
        for i in 0..6 {
            session
                .apply(SessionEvent::AnswerSubmitted(format!("answer {i}")))
                .unwrap();
        }
        session
            .apply(SessionEvent::EvaluationReceived(Evaluation {
                score: 82,
                summary: "Strong fundamentals.".to_string(),
            }))
            .unwrap();
        session
    }

    #[test]
    fn test_new_session_defaults() {
        let session = InterviewSession::new();
        assert_eq!(session.status(), SessionStatus::NotStarted);
        assert!(session.questions().is_empty());
        assert_eq!(session.score(), None);
        assert!(!session.persisted());
    }

    #[test]
    fn test_complete_identity_goes_straight_to_ready() {
        let mut session = InterviewSession::new();
        session
            .apply(SessionEvent::IdentityResolved(identity(
                Some("Ada"),
                Some("a@b.c"),
                Some("1"),
            )))
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Ready);
    }

    #[test]
    fn test_gathering_sequence_name_email_phone() {
        let mut session = InterviewSession::new();
        session
            .apply(SessionEvent::IdentityResolved(CandidateIdentity::default()))
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Gathering);

        let mut seen = Vec::new();
        for value in ["Ada Lovelace", "ada@example.com", "555-0100"] {
            session
                .apply(SessionEvent::FieldSupplied(value.to_string()))
                .unwrap();
            seen.push(session.status());
        }
        assert_eq!(
            seen,
            vec![
                SessionStatus::Gathering,
                SessionStatus::Gathering,
                SessionStatus::Ready
            ]
        );
        assert_eq!(session.candidate().email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_ready_only_when_every_field_present() {
        let cases = [
            (identity(None, Some("e"), Some("p")), SessionStatus::Gathering),
            (identity(Some("n"), None, Some("p")), SessionStatus::Gathering),
            (identity(Some("n"), Some("e"), None), SessionStatus::Gathering),
            (identity(Some(" "), Some("e"), Some("p")), SessionStatus::Gathering),
            (identity(Some("n"), Some("e"), Some("p")), SessionStatus::Ready),
        ];
        for (id, expected) in cases {
            let mut session = InterviewSession::new();
            session
                .apply(SessionEvent::IdentityResolved(id.clone()))
                .unwrap();
            assert_eq!(session.status(), expected, "{id:?}");
        }
    }

    #[test]
    fn test_blank_field_rejected_without_mutation() {
        let mut session = InterviewSession::new();
        session
            .apply(SessionEvent::IdentityResolved(identity(Some("Ada"), None, None)))
            .unwrap();
        let before = session.clone();

        let err = session
            .apply(SessionEvent::FieldSupplied("  \t".to_string()))
            .unwrap_err();
        assert_eq!(err, TransitionError::BlankValue(Field::Email));
        assert_eq!(session, before);
    }

    #[test]
    fn test_questions_received_starts_at_first_question() {
        let session = in_progress();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.current_question_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.current_question().unwrap().text, "What is JSX?");
    }

    #[test]
    fn test_answer_advances_then_last_answer_evaluates() {
        let mut session = in_progress();
        for i in 0..5 {
            session
                .apply(SessionEvent::AnswerSubmitted(format!("a{i}")))
                .unwrap();
            assert_eq!(session.status(), SessionStatus::InProgress);
            assert_eq!(session.current_question_index(), i + 1);
        }
        session
            .apply(SessionEvent::AnswerSubmitted(String::new()))
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Evaluating);
        assert_eq!(session.answers().len(), session.questions().len());
        assert_eq!(session.answers()[5], "");
        assert_eq!(session.current_question(), None);
    }

    #[test]
    fn test_answers_never_exceed_questions() {
        let mut session = in_progress();
        for _ in 0..6 {
            session
                .apply(SessionEvent::AnswerSubmitted("x".to_string()))
                .unwrap();
        }
        let err = session
            .apply(SessionEvent::AnswerSubmitted("one too many".to_string()))
            .unwrap_err();
        assert!(matches!(err, TransitionError::NotAccepted { .. }));
        assert_eq!(session.answers().len(), 6);
    }

    #[test]
    fn test_no_state_skipping() {
        let mut ready = InterviewSession::new();
        ready
            .apply(SessionEvent::IdentityResolved(identity(
                Some("n"),
                Some("e"),
                Some("p"),
            )))
            .unwrap();
        let before = ready.clone();
        let err = ready
            .apply(SessionEvent::EvaluationReceived(Evaluation {
                score: 50,
                summary: String::new(),
            }))
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotAccepted {
                status: SessionStatus::Ready,
                event: "evaluation_received"
            }
        );
        assert_eq!(ready, before);

        let mut fresh = InterviewSession::new();
        assert!(fresh
            .apply(SessionEvent::AnswerSubmitted("x".to_string()))
            .is_err());
        assert!(fresh.apply(SessionEvent::Persisted).is_err());
    }

    #[test]
    fn test_evaluation_sets_score_and_summary() {
        let session = completed();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.score(), Some(82));
        assert_eq!(session.summary(), Some("Strong fundamentals."));
    }

    #[test]
    fn test_persisted_flips_exactly_once() {
        let mut session = completed();
        session.apply(SessionEvent::Persisted).unwrap();
        assert!(session.persisted());
        assert_eq!(
            session.apply(SessionEvent::Persisted),
            Err(TransitionError::AlreadyPersisted)
        );
        assert!(session.persisted());
    }

    #[test]
    fn test_reset_replaces_epoch() {
        let old = completed();
        let fresh = InterviewSession::new();
        assert_ne!(old.epoch(), fresh.epoch());
        assert_eq!(fresh.status(), SessionStatus::NotStarted);
        assert!(!fresh.persisted());
    }

    #[test]
    fn test_resumable_statuses() {
        assert!(!SessionStatus::NotStarted.is_resumable());
        assert!(SessionStatus::Gathering.is_resumable());
        assert!(SessionStatus::InProgress.is_resumable());
        assert!(SessionStatus::Evaluating.is_resumable());
        assert!(!SessionStatus::Completed.is_resumable());
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_progress() {
        let mut session = in_progress();
        session
            .apply(SessionEvent::AnswerSubmitted("first".to_string()))
            .unwrap();
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"in_progress\""));
        let restored: InterviewSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
