//! YouTube caption tracks over plain HTTP.
//!
//! Track metadata is read from the player response embedded in the watch page;
//! caption data is downloaded in YouTube's `json3` timed-text format.

use super::{TranscriptResult, TranscriptSegment, TranscriptSource, TranscriptTrack};
use crate::error::TranscriptError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Caption source backed by youtube.com.
pub struct YoutubeTranscriptSource {
    http: reqwest::Client,
    base_url: String,
}

impl YoutubeTranscriptSource {
    /// Create a source against a custom base URL.
    pub fn with_config(base_url: &str, timeout: Duration) -> crate::error::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str) -> TranscriptResult<String> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| TranscriptError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptError::Network(format!("{} returned HTTP {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| TranscriptError::Network(e.to_string()))
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    #[instrument(skip(self))]
    async fn list_tracks(&self, video_id: &str) -> TranscriptResult<Vec<TranscriptTrack>> {
        let watch_url = format!("{}/watch?v={}", self.base_url, video_id);
        let html = self.get_text(&watch_url).await?;

        let mut tracks = parse_caption_tracks(video_id, &html)?;
        for track in &mut tracks {
            track.url = self.absolute_url(&track.url);
        }

        debug!("Found {} caption tracks for {}", tracks.len(), video_id);
        Ok(tracks)
    }

    #[instrument(skip(self, track), fields(video_id = %track.video_id, language = %track.language_code))]
    async fn fetch_track(&self, track: &TranscriptTrack) -> TranscriptResult<Vec<TranscriptSegment>> {
        let url = json3_url(&track.url)?;
        let body = self.get_text(&url).await?;

        if body.trim().is_empty() {
            return Err(TranscriptError::NotFound {
                video_id: track.video_id.clone(),
                requested: track.language_code.clone(),
            });
        }

        parse_json3(&body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<RawText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawText {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<RawRun>,
}

#[derive(Debug, Deserialize)]
struct RawRun {
    text: String,
}

impl RawText {
    fn into_string(self) -> String {
        match self.simple_text {
            Some(text) => text,
            None => self.runs.into_iter().map(|r| r.text).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Read the caption tracks out of a watch page.
fn parse_caption_tracks(video_id: &str, html: &str) -> TranscriptResult<Vec<TranscriptTrack>> {
    if let Some(raw) = extract_json_after(html, "\"captionTracks\":") {
        let tracks: Vec<RawCaptionTrack> = serde_json::from_str(raw)
            .map_err(|e| TranscriptError::Malformed(format!("caption tracks: {}", e)))?;

        if tracks.is_empty() {
            return Err(TranscriptError::NotFound {
                video_id: video_id.to_string(),
                requested: "any language".to_string(),
            });
        }

        return Ok(tracks
            .into_iter()
            .map(|t| TranscriptTrack {
                video_id: video_id.to_string(),
                name: t.name.map(RawText::into_string).unwrap_or_else(|| t.language_code.clone()),
                is_generated: t.kind.as_deref() == Some("asr"),
                language_code: t.language_code,
                url: t.base_url,
            })
            .collect());
    }

    let raw_status = extract_json_after(html, "\"playabilityStatus\":").ok_or_else(|| {
        TranscriptError::Malformed("watch page contains no player response".to_string())
    })?;
    let status: PlayabilityStatus = serde_json::from_str(raw_status)
        .map_err(|e| TranscriptError::Malformed(format!("playability status: {}", e)))?;

    if status.status != "OK" {
        return Err(TranscriptError::VideoUnavailable {
            video_id: video_id.to_string(),
            reason: status.reason.unwrap_or(status.status),
        });
    }

    Err(TranscriptError::Disabled(video_id.to_string()))
}

/// Parse `json3` timed text into segments.
fn parse_json3(body: &str) -> TranscriptResult<Vec<TranscriptSegment>> {
    let parsed: Json3 = serde_json::from_str(body)
        .map_err(|e| TranscriptError::Malformed(format!("timed text: {}", e)))?;

    Ok(parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment::new(
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
                text,
            ))
        })
        .collect())
}

/// Force the `json3` format on a timed-text URL.
fn json3_url(url: &str) -> TranscriptResult<String> {
    let mut parsed = url::Url::parse(url)
        .map_err(|e| TranscriptError::Malformed(format!("track url {}: {}", url, e)))?;

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(parsed.to_string())
}

/// Return the JSON object or array that follows `marker` in `text`.
///
/// Brackets inside string literals are ignored.
fn extract_json_after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let start = text.find(marker)? + marker.len();
    let rest = text[start..].trim_start();
    let offset = text.len() - rest.len();

    let (open, close) = match rest.chars().next()? {
        '[' => ('[', ']'),
        '{' => ('{', '}'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[offset..offset + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
