//! Shared vector types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensionality of the vectors produced by one embedding model.
///
/// Every vector in an index has exactly this many components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Smallest valid dimension.
    pub const MIN: Self = Self(1);

    /// Create a dimension; zero is rejected.
    pub fn new(dimension: usize) -> Option<Self> {
        (dimension > 0).then_some(Self(dimension))
    }

    /// Number of components.
    pub fn get(self) -> usize {
        self.0
    }

    /// Check a vector against this dimension.
    pub fn matches(self, vector: &[f32]) -> bool {
        vector.len() == self.0
    }
}

impl fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
#[inline]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
