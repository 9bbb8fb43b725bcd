//! Harris interest point detection.
//!
//! Detection smooths the image, forms gradient second-moment products, sums
//! them over a clipped window, scores each pixel with the Harris measure, thins
//! the map with 3x3 non-maximum suppression and keeps the pixels above a
//! percentile threshold.

mod harris;

pub use harris::{detect_interest_points, harris_response};

use crate::util::{FeatVoteError, FeatVoteResult};

/// Configuration for [`detect_interest_points`].
#[derive(Clone, Debug)]
pub struct HarrisConfig {
    /// Upper bound on the number of returned points.
    pub max_points: usize,
    /// Detection scale; the summation window half-width is `2 * floor(scale)`.
    pub scale: f64,
    /// Harris sensitivity `k` in `det(M) - k * trace(M)^2`.
    pub k: f64,
    /// Standard deviation of the denoising Gaussian.
    pub smoothing_sigma: f64,
    /// Quantile of the suppressed score map used as the initial threshold.
    pub percentile: f64,
    /// Computes the response row-parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            max_points: 200,
            scale: 1.0,
            k: 0.05,
            smoothing_sigma: 1.0,
            percentile: 0.98,
            parallel: false,
        }
    }
}

impl HarrisConfig {
    /// Half-width of the second-moment summation window.
    ///
    /// Saturates at `usize::MAX` for scales too large to represent.
    pub fn window_radius(&self) -> usize {
        (self.scale.floor() as usize).saturating_mul(2)
    }

    pub(crate) fn validate(&self) -> FeatVoteResult<()> {
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(FeatVoteError::InvalidInput {
                reason: "scale must be finite and non-negative",
            });
        }
        if !self.k.is_finite() {
            return Err(FeatVoteError::InvalidInput {
                reason: "harris k must be finite",
            });
        }
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(FeatVoteError::InvalidInput {
                reason: "percentile must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

/// One detected point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterestPoint {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
    /// Corner response; larger is stronger.
    pub score: f64,
}

/// Detected points stored as three index-aligned sequences.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterestPoints {
    xs: Vec<usize>,
    ys: Vec<usize>,
    scores: Vec<f64>,
}

impl InterestPoints {
    /// Builds a point set from parallel sequences of equal length.
    pub fn new(xs: Vec<usize>, ys: Vec<usize>, scores: Vec<f64>) -> FeatVoteResult<Self> {
        if xs.len() != ys.len() || xs.len() != scores.len() {
            return Err(FeatVoteError::InvalidInput {
                reason: "xs, ys and scores must have equal length",
            });
        }
        Ok(Self { xs, ys, scores })
    }

    /// Builds a point set from `(x, y)` pairs with zero scores.
    pub fn from_coords(coords: &[(usize, usize)]) -> Self {
        Self {
            xs: coords.iter().map(|&(x, _)| x).collect(),
            ys: coords.iter().map(|&(_, y)| y).collect(),
            scores: vec![0.0; coords.len()],
        }
    }

    pub(crate) fn push(&mut self, x: usize, y: usize, score: f64) {
        self.xs.push(x);
        self.ys.push(y);
        self.scores.push(score);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true when no point was detected.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Column indices.
    pub fn xs(&self) -> &[usize] {
        &self.xs
    }

    /// Row indices.
    pub fn ys(&self) -> &[usize] {
        &self.ys
    }

    /// Corner responses.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Returns point `index` if it exists.
    pub fn get(&self, index: usize) -> Option<InterestPoint> {
        Some(InterestPoint {
            x: *self.xs.get(index)?,
            y: *self.ys.get(index)?,
            score: *self.scores.get(index)?,
        })
    }

    /// Iterates over points in detection order.
    pub fn iter(&self) -> impl Iterator<Item = InterestPoint> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.scores)
            .map(|((&x, &y), &score)| InterestPoint { x, y, score })
    }
}

#[cfg(test)]
mod tests {
    use super::{HarrisConfig, InterestPoint, InterestPoints};

    #[test]
    fn window_radius_floors_scale() {
        let mut cfg = HarrisConfig::default();
        assert_eq!(cfg.window_radius(), 2);
        cfg.scale = 1.9;
        assert_eq!(cfg.window_radius(), 2);
        cfg.scale = 2.0;
        assert_eq!(cfg.window_radius(), 4);
        cfg.scale = 0.5;
        assert_eq!(cfg.window_radius(), 0);
        cfg.scale = 1e30;
        assert_eq!(cfg.window_radius(), usize::MAX);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        let bad_scale = HarrisConfig {
            scale: -1.0,
            ..HarrisConfig::default()
        };
        assert!(bad_scale.validate().is_err());
        let bad_percentile = HarrisConfig {
            percentile: 1.5,
            ..HarrisConfig::default()
        };
        assert!(bad_percentile.validate().is_err());
        assert!(HarrisConfig::default().validate().is_ok());
    }

    #[test]
    fn parallel_sequences_must_align() {
        let ragged = InterestPoints::new(vec![1, 2], vec![3], vec![0.0, 0.0]);
        assert!(ragged.is_err());
        let pts = InterestPoints::new(vec![1, 2], vec![3, 4], vec![0.5, 0.25]).unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(
            pts.get(1),
            Some(InterestPoint {
                x: 2,
                y: 4,
                score: 0.25
            })
        );
        assert_eq!(pts.get(2), None);
        let collected: Vec<_> = pts.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(collected, vec![(1, 3), (2, 4)]);
    }
}
