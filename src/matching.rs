//! Nearest-neighbor descriptor matching with ratio scores.
//!
//! Each descriptor of the first set is matched to its closest descriptor in
//! the second set. The score of a match is the ratio between the best and the
//! second-best distance, so lower scores mean less ambiguous matches.

use crate::descriptor::DescriptorSet;
use crate::kernel::scalar::ScalarKernel;
use crate::kernel::{Kernel, Nearest};
use crate::trace::{trace_event, trace_span};
use crate::util::{FeatVoteError, FeatVoteResult};

/// Configuration for [`match_features`].
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Number of leading descriptor components compared; clamped to the
    /// descriptor length.
    pub distance_dims: usize,
    /// Searches queries in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            distance_dims: 72,
            parallel: false,
        }
    }
}

/// Per-query best match indices and ambiguity ratios.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureMatches {
    indices: Vec<usize>,
    ratios: Vec<f64>,
}

impl FeatureMatches {
    /// Builds a match result from parallel sequences of equal length.
    pub fn new(indices: Vec<usize>, ratios: Vec<f64>) -> FeatVoteResult<Self> {
        if indices.len() != ratios.len() {
            return Err(FeatVoteError::InvalidInput {
                reason: "match indices and ratios must have equal length",
            });
        }
        Ok(Self { indices, ratios })
    }

    /// Number of matched queries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true when there were no queries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Index into the candidate set for each query.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Best-to-second-best distance ratio for each query.
    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Iterates over `(candidate_index, ratio)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices
            .iter()
            .copied()
            .zip(self.ratios.iter().copied())
    }
}

/// Euclidean distance over the first `dims` components of `a` and `b`.
#[inline]
pub fn descriptor_distance(a: &[f64], b: &[f64], dims: usize) -> f64 {
    let n = dims.min(a.len()).min(b.len());
    let mut acc = 0.0f64;
    for (x, y) in a[..n].iter().zip(&b[..n]) {
        let d = x - y;
        acc += d * d;
    }
    acc.sqrt()
}

/// Ratio of best to second-best distance; 0 when the second-best distance is
/// zero or does not exist.
fn ambiguity_ratio(nearest: &Nearest) -> f64 {
    if nearest.second == 0.0 || nearest.second.is_infinite() {
        0.0
    } else {
        nearest.best / nearest.second
    }
}

/// Matches every descriptor of `a` against all descriptors of `b`.
///
/// Scores are accepted for symmetry with the detector output and do not
/// influence the result. An empty `a` yields an empty result.
pub fn match_features(
    a: &DescriptorSet,
    _scores_a: &[f64],
    b: &DescriptorSet,
    _scores_b: &[f64],
    cfg: &MatchConfig,
) -> FeatVoteResult<FeatureMatches> {
    let _span = trace_span!("match_features", queries = a.len(), candidates = b.len()).entered();
    if b.is_empty() {
        return Err(FeatVoteError::EmptyDescriptorSet);
    }
    if a.dims() != b.dims() {
        return Err(FeatVoteError::DescriptorLength {
            expected: b.dims(),
            got: a.dims(),
        });
    }

    let dims = cfg.distance_dims.min(a.dims());
    let nearest = nearest_two(a, b, dims, cfg.parallel);
    let indices = nearest.iter().map(|n| n.index).collect();
    let ratios: Vec<f64> = nearest.iter().map(ambiguity_ratio).collect();

    trace_event!("matches", count = ratios.len());
    Ok(FeatureMatches { indices, ratios })
}

#[cfg(feature = "rayon")]
fn nearest_two(
    a: &DescriptorSet,
    b: &DescriptorSet,
    dims: usize,
    parallel: bool,
) -> Vec<Nearest> {
    if parallel {
        return crate::kernel::rayon::RayonKernel::nearest_two(a, b, dims);
    }
    ScalarKernel::nearest_two(a, b, dims)
}

#[cfg(not(feature = "rayon"))]
fn nearest_two(
    a: &DescriptorSet,
    b: &DescriptorSet,
    dims: usize,
    _parallel: bool,
) -> Vec<Nearest> {
    ScalarKernel::nearest_two(a, b, dims)
}
