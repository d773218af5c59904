//! Data models for transcripts.

use serde::{Deserialize, Serialize};

/// A complete transcript in one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video ID this transcript belongs to.
    pub video_id: String,
    /// Language code of the track the transcript came from.
    pub language_code: String,
    /// Whether the track was generated by automatic speech recognition.
    pub is_generated: bool,
    /// Individual transcript segments with timestamps.
    pub segments: Vec<TranscriptSegment>,
    /// Full transcript text (segments joined with spaces, in original order).
    pub text: String,
}

impl Transcript {
    /// Create a new transcript from segments.
    pub fn new(
        video_id: String,
        language_code: String,
        is_generated: bool,
        segments: Vec<TranscriptSegment>,
    ) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            video_id,
            language_code,
            is_generated,
            segments,
            text,
        }
    }

    /// Total duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.segments
            .last()
            .map(|s| s.start_seconds + s.duration_seconds)
            .unwrap_or(0.0)
    }
}

/// A single caption line with timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start_seconds: f64,
    /// Duration in seconds.
    pub duration_seconds: f64,
    /// Caption text.
    pub text: String,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(start_seconds: f64, duration_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            duration_seconds,
            text: text.into(),
        }
    }
}

/// One language-specific caption stream offered for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    /// Video the track belongs to.
    pub video_id: String,
    /// Language code (e.g. "en", "es", "pt-BR").
    pub language_code: String,
    /// Human-readable language name.
    pub name: String,
    /// Whether the track was generated by automatic speech recognition.
    pub is_generated: bool,
    /// URL the caption data is served from.
    pub url: String,
}
