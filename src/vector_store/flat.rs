//! Exact (brute-force) cosine index.
//!
//! Transcripts produce at most a few hundred chunks, so a linear scan is cheaper
//! than building any approximate structure.

use super::{cosine_similarity, IndexHandle, Neighbor, VectorIndex};
use crate::error::{KikkError, Result};
use std::cmp::Ordering;

/// Brute-force cosine similarity index.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatIndex;

impl FlatIndex {
    pub fn new() -> Self {
        Self
    }
}

impl VectorIndex for FlatIndex {
    fn build(&self, vectors: Vec<Vec<f32>>) -> Result<IndexHandle> {
        let dimensions = vectors.first().map(Vec::len).unwrap_or(0);

        if let Some((id, bad)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimensions) {
            return Err(KikkError::Index(format!(
                "vector {} has {} dimensions, expected {}",
                id,
                bad.len(),
                dimensions
            )));
        }
        if vectors.iter().flatten().any(|x| !x.is_finite()) {
            return Err(KikkError::Index("vectors contain non-finite values".to_string()));
        }

        Ok(IndexHandle { vectors, dimensions })
    }

    fn query(&self, handle: &IndexHandle, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if handle.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != handle.dimensions {
            return Err(KikkError::Index(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                handle.dimensions
            )));
        }

        let mut neighbors: Vec<Neighbor> = handle
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| Neighbor {
                id,
                score: cosine_similarity(query, vector),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_orders_by_similarity() {
        let index = FlatIndex::new();
        let handle = index
            .build(vec![
                vec![0.0, 1.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![0.7, 0.7, 0.0],
            ])
            .unwrap();

        let hits = index.query(&handle, &[1.0, 0.0, 0.0], 2).unwrap();
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_ties_are_broken_by_id() {
        let index = FlatIndex::new();
        let handle = index
            .build(vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 0.0], vec![1.0, 0.0]])
            .unwrap();

        let hits = index.query(&handle, &[1.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_k_larger_than_index_returns_everything() {
        let index = FlatIndex::new();
        let handle = index.build(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();

        assert_eq!(index.query(&handle, &[1.0, 1.0], 10).unwrap().len(), 2);
        assert!(index.query(&handle, &[1.0, 1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = FlatIndex::new();
        let handle = index.build(Vec::new()).unwrap();
        assert!(handle.is_empty());
        assert!(index.query(&handle, &[1.0, 2.0, 3.0], 4).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let index = FlatIndex::new();
        assert!(index.build(vec![vec![1.0, 0.0], vec![1.0]]).is_err());

        let handle = index.build(vec![vec![1.0, 0.0]]).unwrap();
        assert!(index.query(&handle, &[1.0, 0.0, 0.0], 1).is_err());
    }
}
