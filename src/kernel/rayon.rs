//! Rayon-parallel kernels (feature-gated).
//!
//! The corner response is split by output rows and the descriptor search by
//! query; each item runs the scalar arithmetic unchanged, so the output is
//! identical to [`ScalarKernel`](crate::kernel::scalar::ScalarKernel).

use crate::descriptor::DescriptorSet;
use crate::image::OwnedImage;
use crate::kernel::scalar::{nearest_pair, SecondMoments};
use crate::kernel::{Kernel, Nearest};
use crate::util::FeatVoteResult;
use rayon::prelude::*;

/// Row/query-parallel kernel.
pub struct RayonKernel;

impl Kernel for RayonKernel {
    fn corner_response(
        dx: &OwnedImage,
        dy: &OwnedImage,
        radius: usize,
        k: f64,
    ) -> FeatVoteResult<OwnedImage> {
        let moments = SecondMoments::from_gradients(dx, dy)?;
        let mut out = OwnedImage::zeros(dx.width(), dx.height())?;
        let w = moments.width();
        out.data_mut()
            .par_chunks_exact_mut(w)
            .enumerate()
            .for_each(|(y, row)| moments.response_row(y, radius, k, row));
        Ok(out)
    }

    fn nearest_two(
        queries: &DescriptorSet,
        candidates: &DescriptorSet,
        dims: usize,
    ) -> Vec<Nearest> {
        queries
            .as_slice()
            .par_chunks_exact(queries.dims())
            .map(|query| nearest_pair(query, candidates, dims))
            .collect()
    }
}
