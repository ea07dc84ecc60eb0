//! Durable state: the single active session and the roster.
//!
//! Both survive a restart. Reset only replaces the session snapshot; clearing
//! the roster is its own explicit operation.

pub mod postgres;
pub mod redis;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::interview::session::InterviewSession;
use crate::roster::{RosterEntry, TriageStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<InterviewSession>, StoreError>;

    async fn save(&self, session: &InterviewSession) -> Result<(), StoreError>;
}

/// Write-through mirror of the in-memory [`crate::roster::RosterStore`].
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Most recent first.
    async fn load(&self) -> Result<Vec<RosterEntry>, StoreError>;

    async fn insert(&self, entry: &RosterEntry) -> Result<(), StoreError>;

    async fn set_triage_status(&self, id: &str, status: TriageStatus) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

/// Process-lifetime session store, used when no Redis is configured.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<InterviewSession>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn with_session(session: InterviewSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<InterviewSession>, StoreError> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &InterviewSession) -> Result<(), StoreError> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }
}

/// Process-lifetime roster, used when no database is configured.
#[derive(Default)]
pub struct MemoryRosterRepository {
    entries: Mutex<Vec<RosterEntry>>,
}

#[async_trait]
impl RosterRepository for MemoryRosterRepository {
    async fn load(&self) -> Result<Vec<RosterEntry>, StoreError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn insert(&self, entry: &RosterEntry) -> Result<(), StoreError> {
        self.entries.lock().await.insert(0, entry.clone());
        Ok(())
    }

    async fn set_triage_status(&self, id: &str, status: TriageStatus) -> Result<(), StoreError> {
        if let Some(entry) = self.entries.lock().await.iter_mut().find(|e| e.id == id) {
            entry.triage_status = status;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.lock().await.clear();
        Ok(())
    }
}
