//! The station's public face: commands sent to the orchestrator and the view
//! it publishes after every change.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use crate::interview::error::InterviewError;
use crate::interview::identity::Field;
use crate::interview::questions::Question;
use crate::interview::session::InterviewSession;
use crate::roster::{RosterEntry, TriageStatus};
use crate::services::ResumeUpload;

pub type Reply<T> = oneshot::Sender<Result<T, InterviewError>>;

/// The answer to "a previous interview was found, continue it?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreChoice {
    Resume,
    Discard,
}

/// The external call a session is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Identity,
    Questions,
    Evaluation,
}

pub enum Command {
    View {
        reply: oneshot::Sender<StationView>,
    },
    UploadResume {
        upload: ResumeUpload,
        reply: Reply<StationView>,
    },
    SupplyField {
        value: String,
        reply: Reply<StationView>,
    },
    UpdateDraft {
        text: String,
        reply: Reply<StationView>,
    },
    SubmitAnswer {
        text: String,
        reply: Reply<StationView>,
    },
    DisplayChanged {
        fullscreen: bool,
        reply: Reply<StationView>,
    },
    Retry {
        reply: Reply<StationView>,
    },
    Reset {
        reply: Reply<StationView>,
    },
    Restore {
        choice: RestoreChoice,
        reply: Reply<StationView>,
    },
    Roster {
        reply: oneshot::Sender<Vec<RosterEntry>>,
    },
    SetTriageStatus {
        id: String,
        status: TriageStatus,
        reply: Reply<Vec<RosterEntry>>,
    },
    ClearRoster {
        reply: Reply<Vec<RosterEntry>>,
    },
}

/// Everything a front end needs to render the interviewee side.
#[derive(Debug, Clone, Serialize)]
pub struct StationView {
    pub session: InterviewSession,
    pub missing_field: Option<Field>,
    pub prompt: Option<String>,
    pub current_question: Option<Question>,
    pub remaining_seconds: Option<u32>,
    pub draft: String,
    pub paused_for_display: bool,
    pub awaiting_restore: bool,
    pub pending: Option<CallKind>,
    pub last_error: Option<String>,
}

/// Cheap to clone; every clone talks to the same orchestrator.
#[derive(Clone)]
pub struct StationHandle {
    commands: mpsc::Sender<Command>,
    views: watch::Receiver<StationView>,
}

impl StationHandle {
    pub(crate) fn new(commands: mpsc::Sender<Command>, views: watch::Receiver<StationView>) -> Self {
        Self { commands, views }
    }

    /// Receives a fresh view after every processed message.
    pub fn subscribe(&self) -> watch::Receiver<StationView> {
        self.views.clone()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, InterviewError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(build(tx))
            .await
            .map_err(|_| InterviewError::StationUnavailable)?;
        rx.await.map_err(|_| InterviewError::StationUnavailable)?
    }

    pub async fn view(&self) -> Result<StationView, InterviewError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::View { reply: tx })
            .await
            .map_err(|_| InterviewError::StationUnavailable)?;
        rx.await.map_err(|_| InterviewError::StationUnavailable)
    }

    pub async fn upload_resume(&self, upload: ResumeUpload) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::UploadResume { upload, reply })
            .await
    }

    pub async fn supply_field(&self, value: String) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::SupplyField { value, reply })
            .await
    }

    pub async fn update_draft(&self, text: String) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::UpdateDraft { text, reply })
            .await
    }

    pub async fn submit_answer(&self, text: String) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::SubmitAnswer { text, reply })
            .await
    }

    pub async fn display_changed(&self, fullscreen: bool) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::DisplayChanged { fullscreen, reply })
            .await
    }

    pub async fn retry(&self) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::Retry { reply }).await
    }

    pub async fn reset(&self) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::Reset { reply }).await
    }

    pub async fn restore(&self, choice: RestoreChoice) -> Result<StationView, InterviewError> {
        self.request(|reply| Command::Restore { choice, reply })
            .await
    }

    pub async fn roster(&self) -> Result<Vec<RosterEntry>, InterviewError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Roster { reply: tx })
            .await
            .map_err(|_| InterviewError::StationUnavailable)?;
        rx.await.map_err(|_| InterviewError::StationUnavailable)
    }

    pub async fn set_triage_status(
        &self,
        id: String,
        status: TriageStatus,
    ) -> Result<Vec<RosterEntry>, InterviewError> {
        self.request(|reply| Command::SetTriageStatus { id, status, reply })
            .await
    }

    pub async fn clear_roster(&self) -> Result<Vec<RosterEntry>, InterviewError> {
        self.request(|reply| Command::ClearRoster { reply }).await
    }
}
