//! Orientation-histogram descriptors.
//!
//! Every interest point is described by a square grid of cells centered on it.
//! Each cell accumulates gradient magnitudes into orientation bins and the
//! cell histograms are concatenated row by row into one fixed-length vector.

mod histogram;

pub use histogram::{extract_features, GradientField};

use crate::util::{FeatVoteError, FeatVoteResult};

/// Configuration for [`extract_features`].
#[derive(Clone, Debug)]
pub struct DescriptorConfig {
    /// Cells extend this many steps from the center cell in each direction.
    pub grid_radius: usize,
    /// Distance in pixels between neighboring cell centers.
    pub cell_spacing: usize,
    /// Side length of a cell in pixels; must be odd.
    pub cell_size: usize,
    /// Number of equal orientation slices of `[-pi, pi)`.
    pub orientation_bins: usize,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            grid_radius: 1,
            cell_spacing: 9,
            cell_size: 9,
            orientation_bins: 8,
        }
    }
}

impl DescriptorConfig {
    /// Descriptor length `(2 * grid_radius + 1)^2 * orientation_bins`.
    pub fn dims(&self) -> usize {
        let side = 2 * self.grid_radius + 1;
        side * side * self.orientation_bins
    }

    pub(crate) fn validate(&self) -> FeatVoteResult<()> {
        if self.orientation_bins == 0 {
            return Err(FeatVoteError::InvalidInput {
                reason: "orientation_bins must be positive",
            });
        }
        if self.cell_size == 0 || self.cell_size % 2 == 0 {
            return Err(FeatVoteError::InvalidInput {
                reason: "cell_size must be odd",
            });
        }
        Ok(())
    }
}

/// Fixed-length descriptor vectors stored contiguously, one per point.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorSet {
    data: Vec<f64>,
    dims: usize,
}

impl DescriptorSet {
    /// Wraps a flat buffer holding `data.len() / dims` vectors of length `dims`.
    pub fn new(dims: usize, data: Vec<f64>) -> FeatVoteResult<Self> {
        if dims == 0 {
            return Err(FeatVoteError::InvalidInput {
                reason: "descriptor dimensionality must be positive",
            });
        }
        if data.len() % dims != 0 {
            return Err(FeatVoteError::DescriptorLength {
                expected: dims,
                got: data.len() % dims,
            });
        }
        Ok(Self { data, dims })
    }

    /// Creates an empty set of `dims`-long descriptors.
    pub fn empty(dims: usize) -> FeatVoteResult<Self> {
        Self::new(dims, Vec::new())
    }

    /// Builds a set from individual vectors, which must be non-empty and of
    /// equal length.
    pub fn from_vecs(vectors: &[Vec<f64>]) -> FeatVoteResult<Self> {
        let dims = vectors.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(dims * vectors.len());
        for v in vectors {
            if v.len() != dims {
                return Err(FeatVoteError::DescriptorLength {
                    expected: dims,
                    got: v.len(),
                });
            }
            data.extend_from_slice(v);
        }
        Self::new(dims, data)
    }

    /// Length of every descriptor.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.data.len() / self.dims
    }

    /// Returns true when the set holds no descriptor.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns descriptor `index` if it exists.
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.dims)?;
        self.data.get(start..start.checked_add(self.dims)?)
    }

    /// Iterates over descriptors in point order.
    pub fn iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.dims)
    }

    /// Returns the flat backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
