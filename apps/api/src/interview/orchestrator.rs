//! Station orchestrator: the single writer of the interview session.
//!
//! Commands from the HTTP layer, replies from the interview services and
//! timer signals all arrive on channels and are handled one at a time by
//! [`Orchestrator::run`]. Entry effects (question generation, fullscreen,
//! evaluation, roster persistence) fire on the status edge, never per message.
//! Every async call is tagged with the session epoch it was made for, so a
//! reply that outlives a reset is dropped.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::interview::error::InterviewError;
use crate::interview::identity::{gathering_prompt, CandidateIdentity};
use crate::interview::integrity::{DisplayHost, IntegrityMonitor};
use crate::interview::questions::{Evaluation, EvaluationReport, Question, QuestionSet};
use crate::interview::session::{InterviewSession, SessionEvent, SessionStatus};
use crate::interview::station::{
    CallKind, Command, Reply, RestoreChoice, StationHandle, StationView,
};
use crate::interview::timer::{QuestionTimer, TimerSignal, TimerSignalKind, TimerTag};
use crate::roster::{CompletedInterview, RosterEntry, RosterStore, TriageStatus};
use crate::services::{InterviewServices, ResumeUpload};
use crate::storage::{RosterRepository, SessionStore, StoreError};

const COMMAND_BUFFER: usize = 32;

/// Collaborators the station is wired to at startup.
pub struct StationDeps {
    pub services: Arc<dyn InterviewServices>,
    pub sessions: Arc<dyn SessionStore>,
    pub roster: Arc<dyn RosterRepository>,
    pub display: Arc<dyn DisplayHost>,
}

enum Outcome {
    Identity(Result<CandidateIdentity, InterviewError>),
    Questions(Result<Vec<Question>, InterviewError>),
    Evaluation(Result<EvaluationReport, InterviewError>),
}

impl Outcome {
    fn kind(&self) -> CallKind {
        match self {
            Outcome::Identity(_) => CallKind::Identity,
            Outcome::Questions(_) => CallKind::Questions,
            Outcome::Evaluation(_) => CallKind::Evaluation,
        }
    }
}

struct Completion {
    epoch: Uuid,
    outcome: Outcome,
}

pub struct Orchestrator {
    deps: StationDeps,
    session: InterviewSession,
    roster: RosterStore,
    monitor: IntegrityMonitor,
    timer: Option<QuestionTimer>,
    remaining: Option<u32>,
    draft: String,
    pending: Option<CallKind>,
    awaiting_restore: bool,
    last_error: Option<String>,
    commands: mpsc::Receiver<Command>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    timer_tx: mpsc::UnboundedSender<TimerSignal>,
    timer_signals: mpsc::UnboundedReceiver<TimerSignal>,
    views: watch::Sender<StationView>,
}

impl Orchestrator {
    /// Loads the last snapshot and roster and builds a station around them.
    ///
    /// A snapshot caught mid-interview is held until the user chooses to
    /// resume or discard it. A scored session that never reached the roster
    /// is persisted immediately.
    pub async fn restore(deps: StationDeps) -> Result<(Self, StationHandle), StoreError> {
        let session = deps.sessions.load().await?.unwrap_or_default();
        let roster = RosterStore::from_entries(deps.roster.load().await?);
        let awaiting_restore = session.status().is_resumable();

        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (timer_tx, timer_signals) = mpsc::unbounded_channel();
        let (views, views_rx) = watch::channel(StationView {
            session: session.clone(),
            missing_field: None,
            prompt: None,
            current_question: None,
            remaining_seconds: None,
            draft: String::new(),
            paused_for_display: false,
            awaiting_restore,
            pending: None,
            last_error: None,
        });

        let mut orchestrator = Self {
            deps,
            session,
            roster,
            monitor: IntegrityMonitor::default(),
            timer: None,
            remaining: None,
            draft: String::new(),
            pending: None,
            awaiting_restore,
            last_error: None,
            commands,
            completions_tx,
            completions,
            timer_tx,
            timer_signals,
            views,
        };

        if awaiting_restore {
            info!(
                "Found interrupted interview {} ({:?}), waiting for resume or discard",
                orchestrator.session.epoch(),
                orchestrator.session.status()
            );
        } else if orchestrator.session.status() == SessionStatus::Completed
            && !orchestrator.session.persisted()
        {
            orchestrator.persist_completed().await;
            orchestrator.save_session().await;
        }

        orchestrator.publish();
        let handle = StationHandle::new(commands_tx, views_rx);
        Ok((orchestrator, handle))
    }

    /// Processes messages until every [`StationHandle`] has been dropped.
    pub async fn run(mut self) {
        info!("Interview station running, session {}", self.session.epoch());
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion).await,
                Some(signal) = self.timer_signals.recv() => self.handle_timer(signal).await,
            }
            self.publish();
        }
        info!("Interview station stopped");
    }

    fn view(&self) -> StationView {
        let status = self.session.status();
        let missing_field = match status {
            SessionStatus::Gathering => self.session.candidate().first_missing(),
            _ => None,
        };
        StationView {
            session: self.session.clone(),
            missing_field,
            prompt: missing_field.map(gathering_prompt),
            current_question: self.session.current_question().cloned(),
            remaining_seconds: self.remaining,
            draft: self.draft.clone(),
            paused_for_display: !self.awaiting_restore && self.monitor.is_paused(status),
            awaiting_restore: self.awaiting_restore,
            pending: self.pending,
            last_error: self.last_error.clone(),
        }
    }

    fn publish(&self) {
        self.views.send_replace(self.view());
    }

    fn respond(&self, reply: Reply<StationView>, result: Result<(), InterviewError>) {
        let _ = reply.send(result.map(|()| self.view()));
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::View { reply } => {
                let _ = reply.send(self.view());
            }
            Command::UploadResume { upload, reply } => {
                let result = self.upload_resume(upload);
                self.respond(reply, result);
            }
            Command::SupplyField { value, reply } => {
                let result = self.supply_field(value).await;
                self.respond(reply, result);
            }
            Command::UpdateDraft { text, reply } => {
                let result = self.update_draft(text);
                self.respond(reply, result);
            }
            Command::SubmitAnswer { text, reply } => {
                let result = self.submit_answer(text).await;
                self.respond(reply, result);
            }
            Command::DisplayChanged { fullscreen, reply } => {
                if self.monitor.observe(fullscreen) {
                    debug!("Display reported fullscreen={fullscreen}");
                }
                self.respond(reply, Ok(()));
            }
            Command::Retry { reply } => {
                let result = self.retry();
                self.respond(reply, result);
            }
            Command::Reset { reply } => {
                self.reset().await;
                self.respond(reply, Ok(()));
            }
            Command::Restore { choice, reply } => {
                let result = self.restore_choice(choice).await;
                self.respond(reply, result);
            }
            Command::Roster { reply } => {
                let _ = reply.send(self.roster.entries().to_vec());
            }
            Command::SetTriageStatus { id, status, reply } => {
                let result = self.set_triage_status(&id, status).await;
                let _ = reply.send(result);
            }
            Command::ClearRoster { reply } => {
                let result = self.clear_roster().await;
                let _ = reply.send(result);
            }
        }
    }

    fn ensure_restored(&self) -> Result<(), InterviewError> {
        if self.awaiting_restore {
            return Err(InterviewError::Input(
                "A previous interview was found. Choose to resume or discard it first.".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> Result<(), InterviewError> {
        if self.monitor.is_paused(self.session.status()) {
            return Err(InterviewError::Input(
                "The interview is paused. Return to fullscreen to continue; the timer is still running."
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn upload_resume(&mut self, upload: ResumeUpload) -> Result<(), InterviewError> {
        self.ensure_restored()?;
        if self.session.status() != SessionStatus::NotStarted {
            return Err(InterviewError::Input(
                "A resume has already been processed. Reset to start a new interview.".to_string(),
            ));
        }
        if self.pending.is_some() {
            return Err(InterviewError::Input(
                "A resume is already being processed.".to_string(),
            ));
        }

        info!("Processing resume {}", upload.file_name);
        let services = Arc::clone(&self.deps.services);
        self.spawn_call(CallKind::Identity, async move {
            let result = match services.extract_text(&upload).await {
                Ok(text) => services.extract_identity(&text).await,
                Err(e) => Err(e),
            };
            Outcome::Identity(result)
        });
        Ok(())
    }

    async fn supply_field(&mut self, value: String) -> Result<(), InterviewError> {
        self.ensure_restored()?;
        self.transition(SessionEvent::FieldSupplied(value)).await
    }

    fn update_draft(&mut self, text: String) -> Result<(), InterviewError> {
        self.ensure_restored()?;
        if self.session.status() != SessionStatus::InProgress {
            return Err(InterviewError::Input(
                "There is no question to answer right now.".to_string(),
            ));
        }
        self.ensure_not_paused()?;
        self.draft = text;
        Ok(())
    }

    async fn submit_answer(&mut self, text: String) -> Result<(), InterviewError> {
        self.ensure_restored()?;
        self.ensure_not_paused()?;
        self.transition(SessionEvent::AnswerSubmitted(text)).await?;
        self.draft.clear();
        Ok(())
    }

    fn retry(&mut self) -> Result<(), InterviewError> {
        self.ensure_restored()?;
        if self.pending.is_some() {
            return Err(InterviewError::Input(
                "A request is already in flight.".to_string(),
            ));
        }
        match self.session.status() {
            SessionStatus::Ready => self.request_questions(),
            SessionStatus::Evaluating => self.request_evaluation(),
            status => {
                return Err(InterviewError::Input(format!(
                    "Nothing to retry while {status:?}"
                )))
            }
        }
        Ok(())
    }

    /// Starts a brand new session. The roster is untouched.
    async fn reset(&mut self) {
        if self.session.status() == SessionStatus::InProgress {
            self.release_display();
        }
        let previous = self.session.epoch();
        self.session = InterviewSession::new();
        self.monitor = IntegrityMonitor::default();
        self.timer = None;
        self.remaining = None;
        self.draft.clear();
        self.pending = None;
        self.last_error = None;
        self.awaiting_restore = false;
        info!("Session {previous} reset, new session {}", self.session.epoch());
        self.save_session().await;
    }

    async fn restore_choice(&mut self, choice: RestoreChoice) -> Result<(), InterviewError> {
        if !self.awaiting_restore {
            return Err(InterviewError::Input(
                "There is no interrupted interview to restore.".to_string(),
            ));
        }
        match choice {
            RestoreChoice::Discard => self.reset().await,
            RestoreChoice::Resume => {
                self.awaiting_restore = false;
                info!(
                    "Resuming session {} at {:?}",
                    self.session.epoch(),
                    self.session.status()
                );
                match self.session.status() {
                    SessionStatus::Ready => self.request_questions(),
                    SessionStatus::InProgress => {
                        self.sync_timer();
                        self.acquire_display();
                    }
                    SessionStatus::Evaluating => self.request_evaluation(),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    async fn set_triage_status(
        &mut self,
        id: &str,
        status: TriageStatus,
    ) -> Result<Vec<RosterEntry>, InterviewError> {
        self.ensure_restored()?;
        if self.roster.set_triage_status(id, status) {
            if let Err(e) = self.deps.roster.set_triage_status(id, status).await {
                error!("Failed to store triage status for {id}: {e}");
                self.last_error = Some(format!("Roster could not be saved: {e}"));
            }
        } else {
            debug!("Ignoring triage update for unknown roster entry {id}");
        }
        Ok(self.roster.entries().to_vec())
    }

    async fn clear_roster(&mut self) -> Result<Vec<RosterEntry>, InterviewError> {
        self.ensure_restored()?;
        self.roster.clear_all();
        info!("Roster cleared");
        if let Err(e) = self.deps.roster.clear().await {
            error!("Failed to clear stored roster: {e}");
            self.last_error = Some(format!("Roster could not be saved: {e}"));
        }
        Ok(self.roster.entries().to_vec())
    }

    fn spawn_call<F>(&mut self, kind: CallKind, call: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let epoch = self.session.epoch();
        let completions = self.completions_tx.clone();
        self.pending = Some(kind);
        self.last_error = None;
        tokio::spawn(async move {
            let outcome = call.await;
            let _ = completions.send(Completion { epoch, outcome });
        });
    }

    fn request_questions(&mut self) {
        if self.pending.is_some() {
            return;
        }
        info!("Requesting questions for session {}", self.session.epoch());
        let services = Arc::clone(&self.deps.services);
        self.spawn_call(CallKind::Questions, async move {
            Outcome::Questions(services.generate_questions().await)
        });
    }

    fn request_evaluation(&mut self) {
        if self.pending.is_some() {
            return;
        }
        info!("Requesting evaluation for session {}", self.session.epoch());
        let services = Arc::clone(&self.deps.services);
        let questions = self.session.questions().to_vec();
        let answers = self.session.answers().to_vec();
        self.spawn_call(CallKind::Evaluation, async move {
            Outcome::Evaluation(services.evaluate(&questions, &answers).await)
        });
    }

    async fn handle_completion(&mut self, completion: Completion) {
        let Completion { epoch, outcome } = completion;
        let kind = outcome.kind();
        if epoch != self.session.epoch() {
            debug!("Discarding {kind:?} reply for stale session {epoch}");
            return;
        }
        if self.pending != Some(kind) {
            debug!("Discarding unexpected {kind:?} reply");
            return;
        }
        self.pending = None;

        let event = match outcome {
            Outcome::Identity(result) => result.map(SessionEvent::IdentityResolved),
            Outcome::Questions(result) => result
                .and_then(QuestionSet::validate)
                .map(SessionEvent::QuestionsReceived),
            Outcome::Evaluation(result) => result
                .and_then(Evaluation::validate)
                .map(SessionEvent::EvaluationReceived),
        };

        let result = match event {
            Ok(event) => self.transition(event).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("{kind:?} call failed for session {epoch}: {e}");
            self.last_error = Some(e.to_string());
        }
    }

    async fn handle_timer(&mut self, signal: TimerSignal) {
        if self.timer.as_ref().map(QuestionTimer::tag) != Some(signal.tag) {
            debug!("Discarding stale timer signal for {:?}", signal.tag);
            return;
        }
        match signal.kind {
            TimerSignalKind::Tick { remaining } => self.remaining = Some(remaining),
            TimerSignalKind::Expired => {
                self.remaining = Some(0);
                info!(
                    "Time is up for question {} of session {}",
                    signal.tag.question_index + 1,
                    signal.tag.epoch
                );
                // Expiry submits even while paused for display.
                let answer = std::mem::take(&mut self.draft);
                if let Err(e) = self.transition(SessionEvent::AnswerSubmitted(answer)).await {
                    warn!("Timed submission rejected: {e}");
                }
            }
        }
    }

    /// Applies one event and runs the entry effects of the status it lands in.
    async fn transition(&mut self, event: SessionEvent) -> Result<(), InterviewError> {
        let before = self.session.status();
        self.session.apply(event)?;
        let after = self.session.status();
        self.last_error = None;
        self.sync_timer();
        if before != after {
            info!(
                "Session {} moved {before:?} -> {after:?}",
                self.session.epoch()
            );
            self.on_enter(before, after).await;
        }
        self.save_session().await;
        Ok(())
    }

    async fn on_enter(&mut self, from: SessionStatus, to: SessionStatus) {
        if from == SessionStatus::InProgress {
            self.release_display();
        }
        match to {
            SessionStatus::Ready => self.request_questions(),
            SessionStatus::InProgress => self.acquire_display(),
            SessionStatus::Evaluating => self.request_evaluation(),
            SessionStatus::Completed => self.persist_completed().await,
            SessionStatus::NotStarted | SessionStatus::Gathering => {}
        }
    }

    /// Keeps exactly one timer running for the current question, if any.
    fn sync_timer(&mut self) {
        let wanted = match self.session.current_question() {
            Some(question) if !self.awaiting_restore => Some((
                TimerTag {
                    epoch: self.session.epoch(),
                    question_index: self.session.current_question_index(),
                },
                question.time_limit_seconds,
            )),
            _ => None,
        };

        match wanted {
            Some((tag, _)) if self.timer.as_ref().map(QuestionTimer::tag) == Some(tag) => {}
            Some((tag, limit)) => {
                debug!("Starting {limit}s timer for question {}", tag.question_index + 1);
                self.timer = Some(QuestionTimer::start(tag, limit, self.timer_tx.clone()));
                self.remaining = Some(limit);
                self.draft.clear();
            }
            None => {
                self.timer = None;
                self.remaining = None;
            }
        }
    }

    fn acquire_display(&self) {
        if let Err(e) = self.deps.display.request_fullscreen() {
            warn!("Fullscreen request failed: {e}");
        }
    }

    fn release_display(&mut self) {
        if self.monitor.is_fullscreen() {
            self.deps.display.release_fullscreen();
            self.monitor.observe(false);
        }
    }

    /// Adds a scored session to the roster once.
    async fn persist_completed(&mut self) {
        if self.session.persisted() {
            return;
        }
        let Some(record) = CompletedInterview::from_session(&self.session) else {
            return;
        };
        if let Err(e) = self.session.apply(SessionEvent::Persisted) {
            warn!("Roster insert skipped: {e}");
            return;
        }
        let entry = self.roster.insert(record);
        info!(
            "Added {} to the roster as {} with score {}",
            entry.candidate.name.as_deref().unwrap_or("candidate"),
            entry.id,
            entry.score
        );
        if let Err(e) = self.deps.roster.insert(&entry).await {
            error!("Failed to store roster entry {}: {e}", entry.id);
            self.last_error = Some(format!("Roster could not be saved: {e}"));
        }
    }

    async fn save_session(&mut self) {
        if let Err(e) = self.deps.sessions.save(&self.session).await {
            error!("Failed to save session snapshot: {e}");
            self.last_error = Some(format!("Progress could not be saved: {e}"));
        }
    }
}
