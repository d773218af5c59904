//! Error types for kikk.

use thiserror::Error;

/// Why a transcript could not be acquired.
///
/// Callers that only care about availability can collapse every variant into
/// "no transcript", but the distinction is kept for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Transcripts are disabled for video {0}")]
    Disabled(String),

    #[error("No transcript found for video {video_id} (requested: {requested})")]
    NotFound { video_id: String, requested: String },

    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("Network error while fetching transcript: {0}")]
    Network(String),

    #[error("Malformed transcript response: {0}")]
    Malformed(String),
}

/// Library-level error type for kikk operations.
#[derive(Error, Debug)]
pub enum KikkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid YouTube URL: {0}")]
    InvalidVideoUrl(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("History store error: {0}")]
    History(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl KikkError {
    /// Whether the failure came from a hosted provider (embeddings, chat, HTTP transport).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            KikkError::Embedding(_) | KikkError::Llm(_) | KikkError::Http(_)
        )
    }
}

/// Result type alias for kikk operations.
pub type Result<T> = std::result::Result<T, KikkError>;
