//! Q&A history persistence.
//!
//! Every answered question is appended as a [`QaRecord`]. Records are never
//! updated or deleted by kikk.

mod memory;
mod sqlite;

pub use memory::MemoryHistoryStore;
pub use sqlite::SqliteHistoryStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the answered media came from. Stored in the `source_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Youtube,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Youtube => write!(f, "youtube"),
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "youtube" => Ok(SourceType::Youtube),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

/// Trim a user ID, mapping blank to absent.
pub fn normalize_user_id(user_id: Option<&str>) -> Option<&str> {
    user_id.map(str::trim).filter(|u| !u.is_empty())
}

/// A record to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQaRecord {
    pub video_url: String,
    pub video_id: String,
    pub question: String,
    pub answer: String,
    pub source_type: SourceType,
    pub user_id: Option<String>,
}

impl NewQaRecord {
    /// A record for a YouTube video. Blank user IDs are treated as absent.
    pub fn youtube(
        video_url: &str,
        video_id: &str,
        question: &str,
        answer: &str,
        user_id: Option<&str>,
    ) -> Self {
        Self {
            video_url: video_url.to_string(),
            video_id: video_id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            source_type: SourceType::Youtube,
            user_id: normalize_user_id(user_id).map(str::to_string),
        }
    }
}

/// A stored question and its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub id: Uuid,
    pub video_url: String,
    pub video_id: String,
    pub question: String,
    pub answer: String,
    pub source_type: SourceType,
    /// Omitted from serialized output when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl QaRecord {
    /// Stamp a new record with an ID and the current time.
    pub fn from_new(record: NewQaRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            video_url: record.video_url,
            video_id: record.video_id,
            question: record.question,
            answer: record.answer,
            source_type: record.source_type,
            user_id: record.user_id,
            created_at: Utc::now(),
        }
    }
}

/// Append-only store of answered questions.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one record.
    async fn insert(&self, record: NewQaRecord) -> Result<QaRecord>;

    /// Records newest first, optionally only those of `user_id` and capped at `limit`.
    ///
    /// A blank `user_id` lists every user's records.
    async fn list(&self, user_id: Option<&str>, limit: Option<usize>) -> Result<Vec<QaRecord>>;
}
