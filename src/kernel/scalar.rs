//! Scalar reference kernels.

use crate::descriptor::DescriptorSet;
use crate::image::OwnedImage;
use crate::kernel::{Kernel, Nearest};
use crate::matching::descriptor_distance;
use crate::util::{FeatVoteError, FeatVoteResult};

/// Single-threaded reference kernel.
pub struct ScalarKernel;

/// Per-pixel gradient second-moment products `dx^2`, `dx*dy`, `dy^2`.
pub(crate) struct SecondMoments {
    xx: Vec<f64>,
    xy: Vec<f64>,
    yy: Vec<f64>,
    width: usize,
    height: usize,
}

impl SecondMoments {
    pub(crate) fn from_gradients(dx: &OwnedImage, dy: &OwnedImage) -> FeatVoteResult<Self> {
        if dx.width() != dy.width() || dx.height() != dy.height() {
            return Err(FeatVoteError::ShapeMismatch {
                expected_width: dx.width(),
                expected_height: dx.height(),
                width: dy.width(),
                height: dy.height(),
            });
        }
        let len = dx.data().len();
        let mut xx = Vec::with_capacity(len);
        let mut xy = Vec::with_capacity(len);
        let mut yy = Vec::with_capacity(len);
        for (&gx, &gy) in dx.data().iter().zip(dy.data()) {
            xx.push(gx * gx);
            xy.push(gx * gy);
            yy.push(gy * gy);
        }
        Ok(Self {
            xx,
            xy,
            yy,
            width: dx.width(),
            height: dx.height(),
        })
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Fills `out` with the Harris response of row `y`.
    ///
    /// Window offsets falling outside the image are skipped, not zero-padded.
    pub(crate) fn response_row(&self, y: usize, radius: usize, k: f64, out: &mut [f64]) {
        let w = self.width;
        let y0 = y.saturating_sub(radius);
        let y1 = y.saturating_add(radius).saturating_add(1).min(self.height);
        for (x, dst) in out.iter_mut().enumerate().take(w) {
            let x0 = x.saturating_sub(radius);
            let x1 = x.saturating_add(radius).saturating_add(1).min(w);
            let mut sxx = 0.0f64;
            let mut sxy = 0.0f64;
            let mut syy = 0.0f64;
            for yy in y0..y1 {
                let base = yy * w;
                for idx in (base + x0)..(base + x1) {
                    sxx += self.xx[idx];
                    sxy += self.xy[idx];
                    syy += self.yy[idx];
                }
            }
            let det = sxx * syy - sxy * sxy;
            let trace = sxx + syy;
            *dst = det - k * (trace * trace);
        }
    }
}

/// Scans every candidate and keeps the two smallest distances.
pub(crate) fn nearest_pair(query: &[f64], candidates: &DescriptorSet, dims: usize) -> Nearest {
    let mut nearest = Nearest {
        index: 0,
        best: f64::INFINITY,
        second: f64::INFINITY,
    };
    for (j, candidate) in candidates.iter().enumerate() {
        let d = descriptor_distance(query, candidate, dims);
        if d < nearest.best {
            nearest.second = nearest.best;
            nearest.best = d;
            nearest.index = j;
        } else if d < nearest.second {
            nearest.second = d;
        }
    }
    nearest
}

impl Kernel for ScalarKernel {
    fn corner_response(
        dx: &OwnedImage,
        dy: &OwnedImage,
        radius: usize,
        k: f64,
    ) -> FeatVoteResult<OwnedImage> {
        let moments = SecondMoments::from_gradients(dx, dy)?;
        let mut out = OwnedImage::zeros(dx.width(), dx.height())?;
        let w = moments.width();
        for (y, row) in out.data_mut().chunks_exact_mut(w).enumerate() {
            moments.response_row(y, radius, k, row);
        }
        Ok(out)
    }

    fn nearest_two(
        queries: &DescriptorSet,
        candidates: &DescriptorSet,
        dims: usize,
    ) -> Vec<Nearest> {
        queries
            .iter()
            .map(|query| nearest_pair(query, candidates, dims))
            .collect()
    }
}
