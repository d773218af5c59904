//! SQLite-backed history store.

use super::{normalize_user_id, HistoryStore, NewQaRecord, QaRecord, SourceType};
use crate::error::{KikkError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS video_summaries (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        video_url TEXT NOT NULL,
        video_id TEXT,
        question TEXT NOT NULL,
        answer TEXT NOT NULL,
        source_type TEXT NOT NULL DEFAULT 'youtube',
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_video_summaries_created_at ON video_summaries(created_at);
    CREATE INDEX IF NOT EXISTS idx_video_summaries_user_id ON video_summaries(user_id);
"#;

/// SQLite-based history store.
pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    /// Open (or create) the history database at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite history store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite history store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| KikkError::History(format!("Failed to acquire lock: {}", e)))
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
        Ok(RawRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            video_url: row.get(2)?,
            video_id: row.get(3)?,
            question: row.get(4)?,
            answer: row.get(5)?,
            source_type: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

/// A row as stored, before parsing typed columns.
struct RawRecord {
    id: String,
    user_id: Option<String>,
    video_url: String,
    video_id: Option<String>,
    question: String,
    answer: String,
    source_type: String,
    created_at: String,
}

impl RawRecord {
    fn into_record(self) -> Result<QaRecord> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| KikkError::History(format!("Invalid record id {}: {}", self.id, e)))?;
        let source_type: SourceType = self.source_type.parse().map_err(KikkError::History)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| KikkError::History(format!("Invalid timestamp {}: {}", self.created_at, e)))?
            .with_timezone(&Utc);

        Ok(QaRecord {
            id,
            video_url: self.video_url,
            video_id: self.video_id.unwrap_or_default(),
            question: self.question,
            answer: self.answer,
            source_type,
            user_id: self.user_id,
            created_at,
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    #[instrument(skip(self, record), fields(video_id = %record.video_id))]
    async fn insert(&self, record: NewQaRecord) -> Result<QaRecord> {
        let record = QaRecord::from_new(record);
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO video_summaries
            (id, user_id, video_url, video_id, question, answer, source_type, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id.to_string(),
                record.user_id,
                record.video_url,
                record.video_id,
                record.question,
                record.answer,
                record.source_type.to_string(),
                // Fixed-width timestamps keep lexical and chronological order equal
                record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;

        debug!("Stored Q&A record {}", record.id);
        Ok(record)
    }

    async fn list(&self, user_id: Option<&str>, limit: Option<usize>) -> Result<Vec<QaRecord>> {
        let conn = self.lock()?;
        let user_id = normalize_user_id(user_id);
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, video_url, video_id, question, answer, source_type, created_at
            FROM video_summaries
            WHERE ?1 IS NULL OR user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit], Self::read_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }

        Ok(records)
    }
}
