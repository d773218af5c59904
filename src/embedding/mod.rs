//! Embedding generation for similarity retrieval.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
///
/// One embedder is used for a whole pipeline run, so every vector it returns has
/// [`Embedder::dimensions`] entries.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}
