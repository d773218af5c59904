//! Transcript acquisition for YouTube videos.
//!
//! A [`TranscriptSource`] knows how to list and download caption tracks; the
//! [`TranscriptAcquirer`] applies the language preference on top of it.

mod models;
mod youtube;

pub use models::{Transcript, TranscriptSegment, TranscriptTrack};
pub use youtube::YoutubeTranscriptSource;

use crate::error::TranscriptError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Result type for transcript operations.
pub type TranscriptResult<T> = std::result::Result<T, TranscriptError>;

/// Trait for caption providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the caption tracks available for a video, in provider order.
    async fn list_tracks(&self, video_id: &str) -> TranscriptResult<Vec<TranscriptTrack>>;

    /// Download the segments of one track.
    async fn fetch_track(&self, track: &TranscriptTrack) -> TranscriptResult<Vec<TranscriptSegment>>;
}

/// Fetches a transcript, preferring one language and falling back to whatever
/// track the provider lists first.
pub struct TranscriptAcquirer {
    source: Arc<dyn TranscriptSource>,
    preferred_language: String,
}

impl TranscriptAcquirer {
    /// Create an acquirer that prefers English.
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self::with_language(source, "en")
    }

    /// Create an acquirer with a custom preferred language.
    pub fn with_language(source: Arc<dyn TranscriptSource>, preferred_language: &str) -> Self {
        Self {
            source,
            preferred_language: preferred_language.to_string(),
        }
    }

    /// Acquire a transcript for a video.
    ///
    /// The preferred language is tried first. On any failure the tracks are listed
    /// again and the first one is used. The error returned is the one from the
    /// fallback attempt.
    #[instrument(skip(self))]
    pub async fn acquire(&self, video_id: &str) -> TranscriptResult<Transcript> {
        match self.fetch_preferred(video_id).await {
            Ok(transcript) => return Ok(transcript),
            Err(e) => debug!(
                "No '{}' transcript for {}: {}; falling back to first listed track",
                self.preferred_language, video_id, e
            ),
        }

        let tracks = self.source.list_tracks(video_id).await?;
        let track = tracks.into_iter().next().ok_or_else(|| TranscriptError::NotFound {
            video_id: video_id.to_string(),
            requested: "any language".to_string(),
        })?;

        self.fetch(&track).await
    }

    async fn fetch_preferred(&self, video_id: &str) -> TranscriptResult<Transcript> {
        let tracks = self.source.list_tracks(video_id).await?;
        let track = select_track(&tracks, &self.preferred_language)
            .cloned()
            .ok_or_else(|| TranscriptError::NotFound {
                video_id: video_id.to_string(),
                requested: self.preferred_language.clone(),
            })?;

        self.fetch(&track).await
    }

    async fn fetch(&self, track: &TranscriptTrack) -> TranscriptResult<Transcript> {
        let segments = self.source.fetch_track(track).await?;

        let transcript = Transcript::new(
            track.video_id.clone(),
            track.language_code.clone(),
            track.is_generated,
            segments,
        );

        if transcript.text.trim().is_empty() {
            return Err(TranscriptError::NotFound {
                video_id: track.video_id.clone(),
                requested: track.language_code.clone(),
            });
        }

        info!(
            "Acquired {} transcript for {} ({} segments, {} chars)",
            transcript.language_code,
            transcript.video_id,
            transcript.segments.len(),
            transcript.text.len()
        );

        Ok(transcript)
    }
}

/// Pick the track for a language: manually created tracks win over generated ones.
pub fn select_track<'a>(tracks: &'a [TranscriptTrack], language: &str) -> Option<&'a TranscriptTrack> {
    tracks
        .iter()
        .find(|t| t.language_code == language && !t.is_generated)
        .or_else(|| tracks.iter().find(|t| t.language_code == language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{track, FakeTranscriptSource};

    #[test]
    fn test_select_track_prefers_manual() {
        let tracks = vec![
            track("vid", "en", true),
            track("vid", "es", false),
            track("vid", "en", false),
        ];

        let selected = select_track(&tracks, "en").unwrap();
        assert!(!selected.is_generated);
        assert_eq!(selected.language_code, "en");

        assert!(select_track(&tracks, "de").is_none());
    }

    #[tokio::test]
    async fn test_acquire_english_track() {
        let source = Arc::new(
            FakeTranscriptSource::new(vec![track("vid", "es", false), track("vid", "en", false)])
                .with_segments("es", &["hola", "mundo"])
                .with_segments("en", &["hello", "world"]),
        );
        let acquirer = TranscriptAcquirer::new(source.clone());

        let transcript = acquirer.acquire("vid").await.unwrap();
        assert_eq!(transcript.language_code, "en");
        assert_eq!(transcript.text, "hello world");
        assert_eq!(source.fetched_languages(), vec!["en".to_string()]);
    }

    #[tokio::test]
    async fn test_acquire_falls_back_to_first_listed_track() {
        let source = Arc::new(
            FakeTranscriptSource::new(vec![track("vid", "es", false), track("vid", "fr", false)])
                .with_segments("es", &["hola", "mundo"])
                .with_segments("fr", &["bonjour"]),
        );
        let acquirer = TranscriptAcquirer::new(source.clone());

        let transcript = acquirer.acquire("vid").await.unwrap();
        assert_eq!(transcript.language_code, "es");
        assert_eq!(transcript.text, "hola mundo");
        assert_eq!(source.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_acquire_falls_back_when_english_download_fails() {
        // English is listed but its download has no segments registered
        let source = Arc::new(
            FakeTranscriptSource::new(vec![track("vid", "de", false), track("vid", "en", true)])
                .with_segments("de", &["hallo"]),
        );
        let acquirer = TranscriptAcquirer::new(source);

        let transcript = acquirer.acquire("vid").await.unwrap();
        assert_eq!(transcript.language_code, "de");
    }

    #[tokio::test]
    async fn test_acquire_reports_disabled_when_both_attempts_fail() {
        let source = Arc::new(FakeTranscriptSource::failing(TranscriptError::Disabled(
            "vid".to_string(),
        )));
        let acquirer = TranscriptAcquirer::new(source.clone());

        let err = acquirer.acquire("vid").await.unwrap_err();
        assert_eq!(err, TranscriptError::Disabled("vid".to_string()));
        assert_eq!(source.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_acquire_with_no_tracks_is_not_found() {
        let source = Arc::new(FakeTranscriptSource::new(Vec::new()));
        let acquirer = TranscriptAcquirer::new(source);

        let err = acquirer.acquire("vid").await.unwrap_err();
        assert!(matches!(err, TranscriptError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_acquire_rejects_blank_transcript() {
        let source = Arc::new(
            FakeTranscriptSource::new(vec![track("vid", "en", false)]).with_segments("en", &["  "]),
        );
        let acquirer = TranscriptAcquirer::new(source);

        assert!(acquirer.acquire("vid").await.is_err());
    }
}
