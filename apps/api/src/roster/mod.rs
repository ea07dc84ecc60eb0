//! Roster: completed interviews awaiting human review.
//!
//! The store is a trusting collection: it never checks for duplicates, the
//! session's `persisted` flag is what keeps a session from being inserted twice.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interview::identity::CandidateIdentity;
use crate::interview::questions::Question;
use crate::interview::session::{InterviewSession, SessionStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageStatus {
    #[default]
    Normal,
    Selected,
    Rejected,
}

impl TriageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TriageStatus::Normal => "normal",
            TriageStatus::Selected => "selected",
            TriageStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(TriageStatus::Normal),
            "selected" => Some(TriageStatus::Selected),
            "rejected" => Some(TriageStatus::Rejected),
            _ => None,
        }
    }
}

/// Everything but `triage_status` is write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub candidate: CandidateIdentity,
    pub questions: Vec<Question>,
    pub answers: Vec<String>,
    pub score: u8,
    pub summary: String,
    pub triage_status: TriageStatus,
    pub created_at: DateTime<Utc>,
}

/// A finished interview on its way into the roster.
#[derive(Debug, Clone)]
pub struct CompletedInterview {
    pub id: Option<String>,
    pub candidate: CandidateIdentity,
    pub questions: Vec<Question>,
    pub answers: Vec<String>,
    pub score: u8,
    pub summary: String,
}

impl CompletedInterview {
    /// `None` unless the session has been scored.
    pub fn from_session(session: &InterviewSession) -> Option<Self> {
        if session.status() != SessionStatus::Completed {
            return None;
        }
        Some(Self {
            id: None,
            candidate: session.candidate().clone(),
            questions: session.questions().to_vec(),
            answers: session.answers().to_vec(),
            score: session.score()?,
            summary: session.summary().unwrap_or_default().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    entries: Vec<RosterEntry>,
}

impl RosterStore {
    /// Entries are expected most recent first.
    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Assigns an id when the record carries none and prepends the entry.
    pub fn insert(&mut self, record: CompletedInterview) -> RosterEntry {
        let entry = RosterEntry {
            id: record.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            candidate: record.candidate,
            questions: record.questions,
            answers: record.answers,
            score: record.score,
            summary: record.summary,
            triage_status: TriageStatus::default(),
            created_at: Utc::now(),
        };
        self.entries.insert(0, entry.clone());
        entry
    }

    /// Unknown ids are ignored. Returns whether an entry matched.
    pub fn set_triage_status(&mut self, id: &str, status: TriageStatus) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.triage_status = status;
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }
}
