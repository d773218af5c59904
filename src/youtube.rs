//! YouTube video references.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A video identified from a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    /// The 11-character YouTube video ID.
    pub video_id: String,
    /// The URL the ID was extracted from.
    pub source_url: String,
}

impl VideoReference {
    /// Parse a URL into a video reference.
    pub fn parse(url: &str) -> Option<Self> {
        extract_video_id(url).map(|video_id| Self {
            video_id,
            source_url: url.to_string(),
        })
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Watch (`v=`), short (`youtu.be/`) and embed (`embed/`) URL shapes
        Regex::new(r"(?:v=|youtu\.be/|embed/)([A-Za-z0-9_-]{11})").expect("Invalid regex")
    })
}

/// Extract the video ID from a YouTube URL.
///
/// Returns the first 11-character token following `v=`, `youtu.be/` or `embed/`.
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
