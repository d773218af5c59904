//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{KikkError, Result};
use crate::openai::{api_key_from_env, create_client, DEFAULT_TIMEOUT_SECS};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
    batch_size: usize,
    max_concurrent: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder from settings, reading the API key from the configured variable.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let client = create_client(
            &settings.base_url,
            &api_key_from_env(&settings.api_key_env),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            dimensions: settings.dimensions as usize,
            batch_size: settings.batch_size.max(1),
            max_concurrent: settings.max_concurrent.max(1),
        })
    }

    async fn embed_chunk(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let expected = input.len();

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(input))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| KikkError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| KikkError::Embedding(format!("Embedding API error: {}", e)))?;

        // Sort by index to ensure correct order
        let mut data: Vec<_> = response.data.into_iter().collect();
        data.sort_by_key(|e| e.index);

        if data.len() != expected {
            return Err(KikkError::Embedding(format!(
                "Expected {} embeddings, received {}",
                expected,
                data.len()
            )));
        }

        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();
        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimensions) {
            return Err(KikkError::Embedding(format!(
                "Model returned {} dimensions, expected {}",
                bad.len(),
                self.dimensions
            )));
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| KikkError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let requests: Vec<_> = texts
            .chunks(self.batch_size)
            .map(|chunk| self.embed_chunk(chunk.to_vec()))
            .collect();

        // `buffered` yields in submission order
        let batches: Vec<Vec<Vec<f32>>> = stream::iter(requests)
            .buffered(self.max_concurrent)
            .try_collect()
            .await?;

        let all_embeddings: Vec<Vec<f32>> = batches.into_iter().flatten().collect();

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
