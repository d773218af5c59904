//! Ephemeral similarity indexes.
//!
//! An index is built from scratch for every request and dropped with it; nothing
//! here is persisted or updated incrementally.

mod flat;

pub use flat::FlatIndex;

use crate::error::Result;

/// A built index over a fixed set of vectors.
///
/// Vector ids are their positions in the slice given to [`VectorIndex::build`].
#[derive(Debug, Clone)]
pub struct IndexHandle {
    pub(crate) vectors: Vec<Vec<f32>>,
    pub(crate) dimensions: usize,
}

impl IndexHandle {
    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality shared by every indexed vector (0 when empty).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A query hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the vector in the build input.
    pub id: usize,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Nearest-neighbour index over embedding vectors.
pub trait VectorIndex: Send + Sync {
    /// Build an index. All vectors must share one dimensionality.
    fn build(&self, vectors: Vec<Vec<f32>>) -> Result<IndexHandle>;

    /// Return up to `k` neighbours of `query`, best first. Equal scores are ordered
    /// by ascending id.
    fn query(&self, handle: &IndexHandle, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
