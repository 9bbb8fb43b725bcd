//! Hot-loop kernels shared by the detector and the matcher.
//!
//! The windowed Harris response and the all-pairs descriptor search dominate
//! the pipeline's cost. Both are per-pixel / per-query independent, so the
//! rayon kernel splits them by rows / queries and runs the same per-item
//! arithmetic as the scalar kernel. Results are bit-identical.

use crate::descriptor::DescriptorSet;
use crate::image::OwnedImage;
use crate::util::FeatVoteResult;

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Best and second-best candidate for one query descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    /// Index of the closest candidate (earliest on ties).
    pub index: usize,
    /// Distance to the closest candidate.
    pub best: f64,
    /// Smallest distance among the other candidates; infinite when there is
    /// only one candidate.
    pub second: f64,
}

/// Kernel trait for the dense passes of the pipeline.
pub trait Kernel {
    /// Computes `det(M) - k * trace(M)^2` at every pixel, where `M` sums the
    /// gradient second-moment products over a `(2 * radius + 1)^2` window
    /// clipped to the image.
    fn corner_response(
        dx: &OwnedImage,
        dy: &OwnedImage,
        radius: usize,
        k: f64,
    ) -> FeatVoteResult<OwnedImage>;

    /// Finds the nearest and second-nearest candidate for every query using
    /// the Euclidean distance over the first `dims` components.
    ///
    /// `candidates` must not be empty.
    fn nearest_two(
        queries: &DescriptorSet,
        candidates: &DescriptorSet,
        dims: usize,
    ) -> Vec<Nearest>;
}
