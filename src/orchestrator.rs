//! Pipeline orchestrator for kikk.
//!
//! Coordinates one request from video URL to persisted answer: transcript
//! acquisition, translation, chunking, retrieval, prompt composition and the
//! final chat completion.

use crate::chunking::{ChunkingConfig, RecursiveChunker};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{KikkError, Result};
use crate::history::{HistoryStore, NewQaRecord, QaRecord, SqliteHistoryStore};
use crate::llm::{ChatClient, OpenAIChatClient};
use crate::rag::{PromptComposer, Retriever, ScoredChunk};
use crate::transcript::{Transcript, TranscriptAcquirer, TranscriptSource, YoutubeTranscriptSource};
use crate::translate::Translator;
use crate::vector_store::{FlatIndex, VectorIndex};
use crate::youtube::VideoReference;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Question asked when the caller does not supply one.
pub const DEFAULT_QUESTION: &str = "Summarize this video";

/// The external collaborators an [`Orchestrator`] drives.
pub struct Components {
    pub transcripts: Arc<dyn TranscriptSource>,
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
    pub chat: Arc<dyn ChatClient>,
    pub history: Arc<dyn HistoryStore>,
}

/// Result of answering a question about one video.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub video: VideoReference,
    pub question: String,
    pub answer: String,
    /// Language of the transcript track that was used.
    pub language_code: String,
    /// Whether the transcript went through the translator.
    pub translated: bool,
    /// Chunks placed in the prompt, in prompt order.
    pub sources: Vec<ScoredChunk>,
    /// The stored record, absent when persistence failed and was not required.
    pub record: Option<QaRecord>,
}

/// A composed prompt together with the chunks it was built from.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    pub prompt: String,
    pub sources: Vec<ScoredChunk>,
}

/// The main orchestrator for the kikk pipeline.
pub struct Orchestrator {
    settings: Settings,
    acquirer: TranscriptAcquirer,
    translator: Translator,
    chunker: RecursiveChunker,
    retriever: Retriever,
    composer: PromptComposer,
    chat: Arc<dyn ChatClient>,
    history: Arc<dyn HistoryStore>,
}

impl Orchestrator {
    /// Create an orchestrator backed by YouTube, the configured OpenAI-compatible
    /// providers and the SQLite history store.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let transcripts = Arc::new(YoutubeTranscriptSource::with_config(
            &settings.youtube.base_url,
            Duration::from_secs(settings.youtube.timeout_secs),
        )?);

        info!(
            "Using chat model {} and embedding model {}",
            settings.llm.model, settings.embedding.model
        );
        let chat = Arc::new(OpenAIChatClient::from_settings(&settings.llm)?);
        let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);

        let history = Arc::new(SqliteHistoryStore::new(&settings.history_path())?);

        let components = Components {
            transcripts,
            embedder,
            index: Arc::new(FlatIndex::new()),
            chat,
            history,
        };

        Self::with_components(settings, prompts, components)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(settings: Settings, prompts: Prompts, components: Components) -> Result<Self> {
        settings.validate()?;

        let acquirer =
            TranscriptAcquirer::with_language(components.transcripts, &settings.youtube.preferred_language);
        let translator = Translator::new(components.chat.clone()).with_prompts(prompts.clone());
        let chunker = RecursiveChunker::new(ChunkingConfig::from_settings(&settings.chunking)?);
        let retriever = Retriever::new(components.embedder, components.index).with_top_k(settings.retrieval.top_k);
        let composer = PromptComposer::new(prompts);

        Ok(Self {
            settings,
            acquirer,
            translator,
            chunker,
            retriever,
            composer,
            chat: components.chat,
            history: components.history,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a reference to the history store.
    pub fn history(&self) -> Arc<dyn HistoryStore> {
        self.history.clone()
    }

    /// Resolve a URL and acquire its transcript, without translating it.
    #[instrument(skip(self))]
    pub async fn transcript(&self, video_url: &str) -> Result<(VideoReference, Transcript)> {
        let video = VideoReference::parse(video_url)
            .ok_or_else(|| KikkError::InvalidVideoUrl(video_url.to_string()))?;

        let transcript = self.acquirer.acquire(&video.video_id).await?;
        Ok((video, transcript))
    }

    /// Chunk an English transcript, retrieve context for `question` and compose the
    /// grounded prompt.
    ///
    /// With a deterministic embedder the same inputs always produce the same prompt.
    pub async fn compose_prompt(&self, transcript_text: &str, question: &str) -> Result<ComposedPrompt> {
        let chunks = self.chunker.split(transcript_text);
        debug!("Split transcript into {} chunks", chunks.len());

        let sources = self.retriever.retrieve(&chunks, question).await?;
        let prompt = self.composer.compose(&sources, question);

        Ok(ComposedPrompt { prompt, sources })
    }

    /// Answer `question` about the video at `video_url` and record the answer.
    ///
    /// A missing or blank question falls back to [`DEFAULT_QUESTION`]. Invalid URLs are
    /// rejected before any network call. A failure to persist the answer is logged and
    /// the answer is still returned, unless `history.require_persist` is set.
    #[instrument(skip(self, question, user_id))]
    pub async fn summarize(
        &self,
        video_url: &str,
        question: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<SummaryOutcome> {
        let question = question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUESTION)
            .to_string();

        let (video, transcript) = self.transcript(video_url).await?;

        let translated = !Translator::is_english(&transcript.language_code);
        let text = self
            .translator
            .to_english(&transcript.text, &transcript.language_code)
            .await?;

        let composed = self.compose_prompt(&text, &question).await?;

        info!("Requesting answer from {}", self.chat.model());
        let answer = self.chat.complete(&composed.prompt).await?;

        let record = self.persist(&video, &question, &answer, user_id).await?;

        info!("Answered question for video {}", video.video_id);

        Ok(SummaryOutcome {
            video,
            question,
            answer,
            language_code: transcript.language_code,
            translated,
            sources: composed.sources,
            record,
        })
    }

    async fn persist(
        &self,
        video: &VideoReference,
        question: &str,
        answer: &str,
        user_id: Option<&str>,
    ) -> Result<Option<QaRecord>> {
        let record = NewQaRecord::youtube(&video.source_url, &video.video_id, question, answer, user_id);

        match self.history.insert(record).await {
            Ok(stored) => Ok(Some(stored)),
            Err(e) if self.settings.history.require_persist => Err(e),
            Err(e) => {
                warn!("Failed to persist answer for {}: {}", video.video_id, e);
                Ok(None)
            }
        }
    }
}
