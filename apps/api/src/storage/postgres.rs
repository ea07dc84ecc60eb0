use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};

use crate::interview::identity::CandidateIdentity;
use crate::interview::questions::Question;
use crate::roster::{RosterEntry, TriageStatus};
use crate::storage::{RosterRepository, StoreError};

#[derive(Debug, FromRow)]
struct RosterRow {
    id: String,
    candidate: Json<CandidateIdentity>,
    questions: Json<Vec<Question>>,
    answers: Json<Vec<String>>,
    score: i16,
    summary: String,
    triage_status: String,
    created_at: DateTime<Utc>,
}

impl From<RosterRow> for RosterEntry {
    fn from(row: RosterRow) -> Self {
        let triage_status = TriageStatus::parse(&row.triage_status).unwrap_or_else(|| {
            warn!(
                "Roster entry {} has unknown triage status '{}', treating as normal",
                row.id, row.triage_status
            );
            TriageStatus::Normal
        });
        RosterEntry {
            id: row.id,
            candidate: row.candidate.0,
            questions: row.questions.0,
            answers: row.answers.0,
            score: row.score.clamp(0, 100) as u8,
            summary: row.summary,
            triage_status,
            created_at: row.created_at,
        }
    }
}

pub struct PgRosterRepository {
    pool: PgPool,
}

impl PgRosterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterRepository for PgRosterRepository {
    async fn load(&self) -> Result<Vec<RosterEntry>, StoreError> {
        let rows = sqlx::query_as::<_, RosterRow>(
            r#"
            SELECT id, candidate, questions, answers, score, summary, triage_status, created_at
            FROM roster_entries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RosterEntry::from).collect())
    }

    async fn insert(&self, entry: &RosterEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO roster_entries
                (id, candidate, questions, answers, score, summary, triage_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&entry.id)
        .bind(Json(&entry.candidate))
        .bind(Json(&entry.questions))
        .bind(Json(&entry.answers))
        .bind(i16::from(entry.score))
        .bind(&entry.summary)
        .bind(entry.triage_status.as_str())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        info!("Inserted roster entry {}", entry.id);
        Ok(())
    }

    async fn set_triage_status(&self, id: &str, status: TriageStatus) -> Result<(), StoreError> {
        sqlx::query("UPDATE roster_entries SET triage_status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM roster_entries")
            .execute(&self.pool)
            .await?;
        info!("Cleared {} roster entries", result.rows_affected());
        Ok(())
    }
}
