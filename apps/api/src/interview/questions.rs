//! Question and evaluation payloads, and the validation that guards them.
//!
//! Generated questions are only accepted as a whole: exactly six, two per
//! difficulty tier, each with the time limit its tier dictates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interview::error::InterviewError;

pub const QUESTIONS_PER_SESSION: usize = 6;
const PER_TIER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn time_limit_seconds(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Serialized in the wire shape the generation service speaks:
/// `{"question": "...", "difficulty": "Easy", "time": 20}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub difficulty: Difficulty,
    #[serde(rename = "time")]
    pub time_limit_seconds: u32,
}

impl Question {
    pub fn new(text: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            text: text.into(),
            difficulty,
            time_limit_seconds: difficulty.time_limit_seconds(),
        }
    }
}

/// A question list that passed validation. Only constructible through
/// [`QuestionSet::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    pub fn validate(questions: Vec<Question>) -> Result<Self, InterviewError> {
        if questions.len() != QUESTIONS_PER_SESSION {
            return Err(InterviewError::Validation(format!(
                "expected {QUESTIONS_PER_SESSION} questions, got {}",
                questions.len()
            )));
        }

        for tier in Difficulty::ALL {
            let count = questions.iter().filter(|q| q.difficulty == tier).count();
            if count != PER_TIER {
                return Err(InterviewError::Validation(format!(
                    "expected {PER_TIER} {tier} questions, got {count}"
                )));
            }
        }

        if let Some(q) = questions
            .iter()
            .find(|q| q.time_limit_seconds != q.difficulty.time_limit_seconds())
        {
            return Err(InterviewError::Validation(format!(
                "{} question has time {} (expected {})",
                q.difficulty,
                q.time_limit_seconds,
                q.difficulty.time_limit_seconds()
            )));
        }

        if questions.iter().any(|q| q.text.trim().is_empty()) {
            return Err(InterviewError::Validation(
                "question text cannot be empty".to_string(),
            ));
        }

        Ok(Self(questions))
    }

    pub fn into_inner(self) -> Vec<Question> {
        self.0
    }
}

/// Raw evaluation reply, before range checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub score: f64,
    pub summary: String,
}

/// A validated evaluation: integer score in `0..=100` plus its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub score: u8,
    pub summary: String,
}

impl Evaluation {
    pub fn validate(report: EvaluationReport) -> Result<Self, InterviewError> {
        let score = report.score.round();
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(InterviewError::Validation(format!(
                "score {} is outside 0..=100",
                report.score
            )));
        }
        Ok(Self {
            score: score as u8,
            summary: report.summary,
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_questions() -> Vec<Question> {
    vec![
        Question::new("What is JSX?", Difficulty::Easy),
        Question::new("What does npm install do?", Difficulty::Easy),
        Question::new("Explain the React reconciliation algorithm.", Difficulty::Medium),
        Question::new("How does the Node.js event loop schedule timers?", Difficulty::Medium),
        Question::new("Design a rate limiter for an Express API.", Difficulty::Hard),
        Question::new("How would you shard a session store?", Difficulty::Hard),
    ]
}
