//! Exact nearest-neighbor search over chunk vectors.

use std::cmp::Ordering;

use thiserror::Error;

use super::types::{VectorDimension, squared_l2};

/// Errors from building or querying a vector index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorIndexError {
    #[error("Vector at position {position} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        position: usize,
    },

    #[error("Query vector has dimension {actual}, expected {expected}")]
    QueryDimensionMismatch { expected: usize, actual: usize },
}

/// One search hit: distance to the query and position in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Squared Euclidean distance (lower is closer).
    pub distance: f32,

    /// Insertion position of the matched vector.
    pub position: usize,
}

impl Neighbor {
    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.position.cmp(&other.position))
    }
}

/// Nearest-neighbor search capability.
///
/// Positions are the order vectors were added in, so callers can keep a
/// parallel array of payloads.
pub trait VectorIndex: Send + Sync {
    /// Dimension every stored vector has.
    fn dimension(&self) -> VectorDimension;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `k` nearest vectors ordered by distance, ties by position.
    ///
    /// An empty index or `k == 0` gives an empty result for any query.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorIndexError>;
}

/// Brute-force index comparing the query against every stored vector.
///
/// Vectors are kept in one contiguous buffer.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimension: VectorDimension,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index.
    pub fn new(dimension: VectorDimension) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Build an index over `vectors`, which must all have `dimension` components.
    pub fn build<V: AsRef<[f32]>>(
        dimension: VectorDimension,
        vectors: &[V],
    ) -> Result<Self, VectorIndexError> {
        let mut index = Self::new(dimension);
        index.data.reserve(vectors.len() * dimension.get());
        for vector in vectors {
            index.add(vector.as_ref())?;
        }

        tracing::debug!(
            target: "index",
            "built flat L2 index: {} vectors, dimension {dimension}",
            index.len()
        );

        Ok(index)
    }

    /// Append a vector and return its position.
    pub fn add(&mut self, vector: &[f32]) -> Result<usize, VectorIndexError> {
        let position = self.len();
        if !self.dimension.matches(vector) {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension.get(),
                actual: vector.len(),
                position,
            });
        }
        self.data.extend_from_slice(vector);
        Ok(position)
    }

    /// Borrow the stored vector at `position`.
    pub fn get(&self, position: usize) -> Option<&[f32]> {
        let dim = self.dimension.get();
        self.data.get(position * dim..(position + 1) * dim)
    }

    fn vectors(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimension.get())
    }
}

impl VectorIndex for FlatL2Index {
    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension.get()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorIndexError> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        if !self.dimension.matches(query) {
            return Err(VectorIndexError::QueryDimensionMismatch {
                expected: self.dimension.get(),
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors()
            .enumerate()
            .map(|(position, vector)| Neighbor {
                distance: squared_l2(query, vector),
                position,
            })
            .collect();

        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k - 1, Neighbor::rank);
            neighbors.truncate(k);
        }
        neighbors.sort_unstable_by(Neighbor::rank);

        tracing::trace!(
            target: "index",
            "searched {} vectors, returning {}",
            self.len(),
            neighbors.len()
        );

        Ok(neighbors)
    }
}
