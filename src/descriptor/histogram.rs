use crate::descriptor::{DescriptorConfig, DescriptorSet};
use crate::filter::sobel_gradients;
use crate::image::{ImageView, OwnedImage};
use crate::interest::InterestPoints;
use crate::trace::{trace_event, trace_span};
use crate::util::math::orientation_bin;
use crate::util::{FeatVoteError, FeatVoteResult};

/// Per-pixel gradient orientation and magnitude of an unsmoothed image.
#[derive(Clone, Debug)]
pub struct GradientField {
    orientation: OwnedImage,
    magnitude: OwnedImage,
}

impl GradientField {
    /// Computes `atan(dy / dx)` (0 where `dx == 0`) and `sqrt(dx^2 + dy^2)`
    /// from Sobel gradients.
    pub fn from_image(image: ImageView<'_, f64>) -> FeatVoteResult<Self> {
        let (dx, dy) = sobel_gradients(image)?;
        let w = dx.width();
        let h = dx.height();
        let orientation = OwnedImage::from_fn(w, h, |x, y| {
            let gx = dx.at(x, y);
            if gx == 0.0 {
                0.0
            } else {
                (dy.at(x, y) / gx).atan()
            }
        })?;
        let magnitude = OwnedImage::from_fn(w, h, |x, y| {
            let gx = dx.at(x, y);
            let gy = dy.at(x, y);
            (gx * gx + gy * gy).sqrt()
        })?;
        Ok(Self {
            orientation,
            magnitude,
        })
    }

    /// Orientation map in radians.
    pub fn orientation(&self) -> &OwnedImage {
        &self.orientation
    }

    /// Magnitude map.
    pub fn magnitude(&self) -> &OwnedImage {
        &self.magnitude
    }

    fn width(&self) -> usize {
        self.magnitude.width()
    }

    fn height(&self) -> usize {
        self.magnitude.height()
    }

    /// Adds the magnitudes of the cell centered at `(cx, cy)` into `hist`.
    fn accumulate_cell(&self, cx: isize, cy: isize, half: isize, hist: &mut [f64]) {
        let w = self.width() as isize;
        let h = self.height() as isize;
        for py in (cy - half)..=(cy + half) {
            if py < 0 || py >= h {
                continue;
            }
            for px in (cx - half)..=(cx + half) {
                if px < 0 || px >= w {
                    continue;
                }
                let (x, y) = (px as usize, py as usize);
                let bin = orientation_bin(self.orientation.at(x, y), hist.len());
                hist[bin] += self.magnitude.at(x, y);
            }
        }
    }

    /// Writes the descriptor of the point `(x, y)` into `out`, which must hold
    /// `cfg.dims()` values.
    fn describe_point(&self, x: usize, y: usize, cfg: &DescriptorConfig, out: &mut [f64]) {
        let r = cfg.grid_radius as isize;
        let spacing = cfg.cell_spacing as isize;
        let half = (cfg.cell_size / 2) as isize;
        let mut cells = out.chunks_exact_mut(cfg.orientation_bins);
        for gy in -r..=r {
            for gx in -r..=r {
                let Some(hist) = cells.next() else {
                    return;
                };
                let cx = x as isize + gx * spacing;
                let cy = y as isize + gy * spacing;
                self.accumulate_cell(cx, cy, half, hist);
            }
        }
    }
}

/// Describes every point of `points` with an orientation histogram grid.
///
/// The returned set is index-aligned with `points` and holds vectors of
/// length `cfg.dims()`. Cells reaching past the image border only count the
/// pixels inside it. A point outside the image is rejected.
pub fn extract_features(
    image: ImageView<'_, f64>,
    points: &InterestPoints,
    cfg: &DescriptorConfig,
) -> FeatVoteResult<DescriptorSet> {
    let _span = trace_span!("extract_features", points = points.len()).entered();
    cfg.validate()?;
    for p in points.iter() {
        if p.x >= image.width() || p.y >= image.height() {
            return Err(FeatVoteError::InvalidInput {
                reason: "interest point lies outside the image",
            });
        }
    }

    let dims = cfg.dims();
    if points.is_empty() {
        return DescriptorSet::empty(dims);
    }

    let field = GradientField::from_image(image)?;
    let mut data = vec![0.0f64; dims * points.len()];
    for (p, out) in points.iter().zip(data.chunks_exact_mut(dims)) {
        field.describe_point(p.x, p.y, cfg, out);
    }

    trace_event!("descriptors", count = points.len(), dims = dims);
    DescriptorSet::new(dims, data)
}

#[cfg(test)]
mod tests {
    use super::{extract_features, GradientField};
    use crate::descriptor::DescriptorConfig;
    use crate::image::OwnedImage;
    use crate::interest::InterestPoints;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn vertical_edge_has_zero_orientation() {
        let img = OwnedImage::from_fn(8, 8, |x, _| if x >= 4 { 1.0 } else { 0.0 }).unwrap();
        let field = GradientField::from_image(img.view()).unwrap();
        // dy vanishes away from the top and bottom rows.
        assert_eq!(field.orientation().get(4, 4), Some(0.0));
        assert_eq!(field.magnitude().get(4, 4), Some(4.0));
        assert_eq!(field.magnitude().get(1, 4), Some(0.0));
    }

    #[test]
    fn diagonal_ramp_points_at_quarter_pi() {
        let img = OwnedImage::from_fn(9, 9, |x, y| (x + y) as f64).unwrap();
        let field = GradientField::from_image(img.view()).unwrap();
        let theta = field.orientation().get(4, 4).unwrap();
        assert!((theta - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn flat_image_gives_zero_interior_descriptor() {
        let img = OwnedImage::from_fn(60, 60, |_, _| 0.3).unwrap();
        let pts = InterestPoints::from_coords(&[(30, 30)]);
        let set = extract_features(img.view(), &pts, &DescriptorConfig::default()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.dims(), 72);
        // Sobel sums of a constant leave rounding residue around 1e-17.
        assert!(set.get(0).unwrap().iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn step_edge_fills_center_cell_bin() {
        // Columns >= 30 are bright; only the center column of cells straddles
        // the edge, and its gradient has zero orientation (bin 4).
        let img = OwnedImage::from_fn(60, 60, |x, _| if x >= 30 { 1.0 } else { 0.0 }).unwrap();
        let pts = InterestPoints::from_coords(&[(30, 30)]);
        let set = extract_features(img.view(), &pts, &DescriptorConfig::default()).unwrap();
        let d = set.get(0).unwrap();
        // Cell (gy, gx) = (0, 0) occupies bins 32..40.
        let center = &d[32..40];
        // Two edge columns of 9 pixels each, magnitude 4.
        assert_eq!(center[4], 72.0);
        let others: f64 = d.iter().sum::<f64>() - 3.0 * 72.0;
        assert!(others.abs() < 1e-12);
    }

    #[test]
    fn cells_outside_image_contribute_nothing() {
        let img = OwnedImage::from_fn(20, 20, |x, y| (x * y) as f64 / 400.0).unwrap();
        let pts = InterestPoints::from_coords(&[(0, 0), (19, 19)]);
        let set = extract_features(img.view(), &pts, &DescriptorConfig::default()).unwrap();
        let first = set.get(0).unwrap();
        // Upper-left cells lie entirely outside the image.
        assert!(first[..8].iter().all(|&v| v == 0.0));
        assert!(first.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn out_of_image_point_is_rejected() {
        let img = OwnedImage::zeros(10, 10).unwrap();
        let pts = InterestPoints::from_coords(&[(10, 3)]);
        let result = extract_features(img.view(), &pts, &DescriptorConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn no_points_gives_empty_set_of_configured_length() {
        let img = OwnedImage::zeros(10, 10).unwrap();
        let pts = InterestPoints::default();
        let set = extract_features(img.view(), &pts, &DescriptorConfig::default()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.dims(), 72);
    }
}
