//! Deterministic fakes for the pipeline's external collaborators.

use crate::config::{Prompts, Settings};
use crate::embedding::Embedder;
use crate::error::{KikkError, Result, TranscriptError};
use crate::history::{HistoryStore, MemoryHistoryStore, NewQaRecord, QaRecord};
use crate::llm::ChatClient;
use crate::orchestrator::{Components, Orchestrator};
use crate::transcript::{TranscriptResult, TranscriptSegment, TranscriptSource, TranscriptTrack};
use crate::vector_store::FlatIndex;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn track(video_id: &str, language_code: &str, is_generated: bool) -> TranscriptTrack {
    TranscriptTrack {
        video_id: video_id.to_string(),
        language_code: language_code.to_string(),
        name: language_code.to_string(),
        is_generated,
        url: format!("https://example.test/{}/{}", video_id, language_code),
    }
}

/// Transcript source serving canned tracks and segments.
pub struct FakeTranscriptSource {
    tracks: TranscriptResult<Vec<TranscriptTrack>>,
    segments: HashMap<String, Vec<TranscriptSegment>>,
    list_calls: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl FakeTranscriptSource {
    pub fn new(tracks: Vec<TranscriptTrack>) -> Self {
        Self {
            tracks: Ok(tracks),
            segments: HashMap::new(),
            list_calls: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// A source whose listing always fails with `error`.
    pub fn failing(error: TranscriptError) -> Self {
        Self {
            tracks: Err(error),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_segments(mut self, language_code: &str, texts: &[&str]) -> Self {
        let segments = texts
            .iter()
            .enumerate()
            .map(|(i, t)| TranscriptSegment::new(i as f64 * 2.0, 2.0, *t))
            .collect();
        self.segments.insert(language_code.to_string(), segments);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fetched_languages(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptSource for FakeTranscriptSource {
    async fn list_tracks(&self, _video_id: &str) -> TranscriptResult<Vec<TranscriptTrack>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.tracks.clone()
    }

    async fn fetch_track(&self, track: &TranscriptTrack) -> TranscriptResult<Vec<TranscriptSegment>> {
        self.fetched.lock().unwrap().push(track.language_code.clone());
        self.segments
            .get(&track.language_code)
            .cloned()
            .ok_or_else(|| TranscriptError::NotFound {
                video_id: track.video_id.clone(),
                requested: track.language_code.clone(),
            })
    }
}

/// Embeds text as counts of a fixed vocabulary plus a constant bias component.
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut vector: Vec<f32> = self
            .vocabulary
            .iter()
            .map(|term| words.iter().filter(|w| **w == term.as_str()).count() as f32)
            .collect();
        vector.push(1.0);
        vector
    }
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self::new(&[
            "cats", "dogs", "rockets", "weather", "alpha", "beta", "gamma", "words", "chorus",
            "dance", "recipe", "bread", "summarize", "video",
        ])
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len() + 1
    }
}

/// Embedder whose provider is down.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(KikkError::Embedding("provider unavailable".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(KikkError::Embedding("provider unavailable".to_string()))
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Chat client returning scripted replies in order (the last one repeats) and
/// recording every prompt it receives.
pub struct ScriptedChat {
    replies: Vec<String>,
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl ScriptedChat {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());

        if self.fail {
            return Err(KikkError::Llm("provider returned 503".to_string()));
        }

        let index = (prompts.len() - 1).min(self.replies.len().saturating_sub(1));
        self.replies
            .get(index)
            .cloned()
            .ok_or_else(|| KikkError::Llm("no scripted reply".to_string()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// History store whose writes always fail.
pub struct BrokenHistoryStore;

#[async_trait]
impl HistoryStore for BrokenHistoryStore {
    async fn insert(&self, _record: NewQaRecord) -> Result<QaRecord> {
        Err(KikkError::History("disk full".to_string()))
    }

    async fn list(&self, _user_id: Option<&str>, _limit: Option<usize>) -> Result<Vec<QaRecord>> {
        Ok(Vec::new())
    }
}

/// Handles to the fakes wired into a test orchestrator.
pub struct Harness {
    pub orchestrator: Orchestrator,
    pub source: Arc<FakeTranscriptSource>,
    pub chat: Arc<ScriptedChat>,
    pub embedder: Arc<KeywordEmbedder>,
    pub history: Arc<MemoryHistoryStore>,
}

pub fn harness(source: FakeTranscriptSource, chat: ScriptedChat) -> Harness {
    let source = Arc::new(source);
    let chat = Arc::new(chat);
    let embedder = Arc::new(KeywordEmbedder::default());
    let history = Arc::new(MemoryHistoryStore::new());

    let components = Components {
        transcripts: source.clone(),
        embedder: embedder.clone(),
        index: Arc::new(FlatIndex::new()),
        chat: chat.clone(),
        history: history.clone(),
    };

    let orchestrator = Orchestrator::with_components(Settings::default(), Prompts::default(), components)
        .expect("default settings are valid");

    Harness {
        orchestrator,
        source,
        chat,
        embedder,
        history,
    }
}
