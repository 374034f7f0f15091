//! Crop-profile similarity index.
//!
//! A flat nearest-neighbor index over the crop embedding matrix: exhaustive
//! squared-L2 search, ascending by distance. Read-only after load and safe
//! to share across concurrent requests.

use serde::{Deserialize, Serialize};

use krishi_core::error::{KrishiError, Result};

/// Read-only similarity index over crop-profile embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropEmbeddingIndex {
    vectors: Vec<Vec<f32>>,
    dim: usize,
}

impl CropEmbeddingIndex {
    /// Build an index from an embedding matrix; every row must share one
    /// dimensionality
    pub fn new(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Err(KrishiError::ArtifactMismatch {
                reason: "similarity index has no rows".to_string(),
            });
        };

        let dim = first.len();
        if dim == 0 {
            return Err(KrishiError::ArtifactMismatch {
                reason: "similarity index has zero-width rows".to_string(),
            });
        }

        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dim {
                return Err(KrishiError::ArtifactMismatch {
                    reason: format!(
                        "index row {} has dimension {} but row 0 has {}",
                        row,
                        vector.len(),
                        dim
                    ),
                });
            }
        }

        Ok(Self { vectors, dim })
    }

    /// Number of indexed rows
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimensionality the index was built with
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Top-k nearest rows, ascending by squared-L2 distance.
    ///
    /// Returns `min(k, len)` hits. Ties break toward the lower row index,
    /// so identical inputs always produce identical ordered output. Query
    /// dimensionality is validated at startup against the transform; a
    /// mismatch here is a programming error and fails loudly.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        assert_eq!(
            query.len(),
            self.dim,
            "query vector dimension {} does not match index dimension {}",
            query.len(),
            self.dim
        );

        let mut hits: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(row, vector)| (row, squared_l2(query, vector)))
            .collect();

        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0))
        });
        hits.truncate(k);
        hits
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index() -> CropEmbeddingIndex {
        CropEmbeddingIndex::new(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 2.0],
            vec![3.0, 3.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_search_orders_by_ascending_distance() {
        let hits = index().search(&[0.0, 0.0], 4);
        let rows: Vec<usize> = hits.iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, vec![0, 1, 2, 3]);
        assert!(hits.windows(2).all(|pair| pair[0].1 <= pair[1].1));
    }

    #[test]
    fn test_search_truncates_to_k() {
        assert_eq!(index().search(&[0.0, 0.0], 2).len(), 2);
        // k beyond the index size returns every row
        assert_eq!(index().search(&[0.0, 0.0], 100).len(), 4);
    }

    #[test]
    fn test_search_tie_breaks_on_lower_row() {
        let index = CropEmbeddingIndex::new(vec![
            vec![1.0, 0.0],
            vec![-1.0, 0.0],
            vec![0.0, 1.0],
        ])
        .unwrap();

        let hits = index.search(&[0.0, 0.0], 3);
        // All distances equal; row order decides
        assert_eq!(hits.iter().map(|(row, _)| *row).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_is_idempotent() {
        let query = [0.3, -0.7];
        assert_eq!(index().search(&query, 3), index().search(&query, 3));
    }

    #[test]
    #[should_panic(expected = "does not match index dimension")]
    fn test_search_panics_on_dimension_mismatch() {
        index().search(&[0.0, 0.0, 0.0], 1);
    }

    #[test]
    fn test_rejects_ragged_matrix() {
        let result = CropEmbeddingIndex::new(vec![vec![0.0, 0.0], vec![1.0]]);
        assert!(matches!(result, Err(KrishiError::ArtifactMismatch { .. })));
    }

    #[test]
    fn test_rejects_empty_matrix() {
        assert!(CropEmbeddingIndex::new(vec![]).is_err());
    }

    proptest! {
        #[test]
        fn prop_search_length_and_ordering(
            rows in proptest::collection::vec(
                proptest::collection::vec(-10.0f32..10.0, 3),
                1..20,
            ),
            query in proptest::collection::vec(-10.0f32..10.0, 3),
            k in 1usize..30,
        ) {
            let total = rows.len();
            let index = CropEmbeddingIndex::new(rows).unwrap();
            let hits = index.search(&query, k);

            prop_assert_eq!(hits.len(), k.min(total));
            prop_assert!(hits.windows(2).all(|pair| pair[0].1 <= pair[1].1));
            prop_assert!(hits.iter().all(|(row, _)| *row < total));
        }
    }
}
