//! Context retrieval for RAG answers.

use crate::chunking::TextChunk;
use crate::embedding::Embedder;
use crate::error::{KikkError, Result};
use crate::vector_store::VectorIndex;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: TextChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Embeds chunks and a query, then returns the top-k chunks by similarity.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever returning 4 chunks.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            top_k: 4,
        }
    }

    /// Set the number of chunks to return.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Return at most `top_k` chunks, most similar first; ties keep document order.
    ///
    /// The index lives only for this call.
    #[instrument(skip(self, chunks, query), fields(chunks = chunks.len(), k = self.top_k))]
    pub async fn retrieve(&self, chunks: &[TextChunk], query: &str) -> Result<Vec<ScoredChunk>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(KikkError::Embedding(format!(
                "Embedded {} of {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let handle = self.index.build(vectors)?;
        let query_vector = self.embedder.embed(query).await?;
        let neighbors = self.index.query(&handle, &query_vector, self.top_k)?;

        let results: Vec<ScoredChunk> = neighbors
            .into_iter()
            .filter_map(|n| {
                chunks.get(n.id).map(|chunk| ScoredChunk {
                    chunk: chunk.clone(),
                    score: n.score,
                })
            })
            .collect();

        debug!(
            "Retrieved chunks {:?}",
            results.iter().map(|r| (r.chunk.ordinal, r.score)).collect::<Vec<_>>()
        );

        Ok(results)
    }
}

/// Join retrieved chunk contents with blank lines, in retrieval order.
pub fn format_context_for_prompt(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
