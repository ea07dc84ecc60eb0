use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::interview::session::InterviewSession;
use crate::storage::{SessionStore, StoreError};

/// Keeps the active session as one JSON document under a single key.
pub struct RedisSessionStore {
    client: redis::Client,
    key: String,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self) -> Result<Option<InterviewSession>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(&self.key).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &InterviewSession) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(&self.key, json).await?;
        debug!("Saved session {} ({:?})", session.epoch(), session.status());
        Ok(())
    }
}
