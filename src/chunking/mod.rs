//! Text chunking for retrieval.
//!
//! Transcripts are split into overlapping, size-bounded chunks that become the
//! unit of retrieval.

mod recursive;

pub use recursive::RecursiveChunker;

use crate::config::ChunkingSettings;
use crate::error::{KikkError, Result};
use serde::{Deserialize, Serialize};

/// A contiguous piece of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Text content of this chunk (never empty).
    pub content: String,
    /// Position of this chunk in the document, starting at 0.
    pub ordinal: usize,
}

impl TextChunk {
    pub fn new(content: String, ordinal: usize) -> Self {
        Self { content, ordinal }
    }

    /// Length of the content in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Size limits for chunking, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum chunk length.
    pub chunk_size: usize,
    /// Characters shared between adjacent chunks.
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Create a config, rejecting an overlap that is not smaller than the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(KikkError::Config("chunk_size must be positive".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(KikkError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}
