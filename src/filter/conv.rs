//! Dense and separable 2D convolution.
//!
//! Both forms compute a true convolution (the kernel is flipped) and keep the
//! input dimensions. Accumulation order is fixed (kernel rows outer, kernel
//! columns inner) so repeated runs are bit-identical.

use crate::filter::border::{map_index, BorderMode};
use crate::image::{ImageView, OwnedImage};
use crate::util::{FeatVoteError, FeatVoteResult};

/// Dense 2D filter with odd width and height.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter2d {
    weights: Vec<f64>,
    width: usize,
    height: usize,
}

impl Filter2d {
    /// Wraps row-major weights. Both dimensions must be odd.
    pub fn new(weights: Vec<f64>, width: usize, height: usize) -> FeatVoteResult<Self> {
        if width == 0 || height == 0 {
            return Err(FeatVoteError::InvalidDimensions { width, height });
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(FeatVoteError::InvalidInput {
                reason: "filter dimensions must be odd",
            });
        }
        if weights.len() != width * height {
            return Err(FeatVoteError::BufferTooSmall {
                needed: width * height,
                got: weights.len(),
            });
        }
        Ok(Self {
            weights,
            width,
            height,
        })
    }

    /// Builds a filter from nested rows of equal length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> FeatVoteResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut weights = Vec::with_capacity(width * height);
        for row in rows {
            if row.as_ref().len() != width {
                return Err(FeatVoteError::InvalidInput {
                    reason: "filter rows must share one length",
                });
            }
            weights.extend_from_slice(row.as_ref());
        }
        Self::new(weights, width, height)
    }

    /// Outer product `col * row^T` of two 1D kernels.
    pub fn outer(row: &[f64], col: &[f64]) -> FeatVoteResult<Self> {
        let mut weights = Vec::with_capacity(row.len() * col.len());
        for &c in col {
            for &r in row {
                weights.push(c * r);
            }
        }
        Self::new(weights, row.len(), col.len())
    }

    /// Horizontal Sobel operator; positive where intensity grows to the right.
    pub fn sobel_x() -> Self {
        Self {
            weights: vec![1.0, 0.0, -1.0, 2.0, 0.0, -2.0, 1.0, 0.0, -1.0],
            width: 3,
            height: 3,
        }
    }

    /// Vertical Sobel operator; positive where intensity grows downward.
    pub fn sobel_y() -> Self {
        Self {
            weights: vec![1.0, 2.0, 1.0, 0.0, 0.0, 0.0, -1.0, -2.0, -1.0],
            width: 3,
            height: 3,
        }
    }

    /// Filter width in taps.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Filter height in taps.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

#[inline]
fn sample(image: &ImageView<'_, f64>, x: isize, y: isize, border: BorderMode) -> f64 {
    match border {
        BorderMode::Zero => image.value_or_zero(x, y),
        BorderMode::Mirror => {
            match (
                map_index(x, image.width(), border),
                map_index(y, image.height(), border),
            ) {
                (Some(mx), Some(my)) => image.get(mx, my).copied().unwrap_or(0.0),
                _ => 0.0,
            }
        }
    }
}

/// Convolves an image with a dense 2D filter.
pub fn convolve2d(
    image: ImageView<'_, f64>,
    filter: &Filter2d,
    border: BorderMode,
) -> FeatVoteResult<OwnedImage> {
    let w = image.width();
    let h = image.height();
    let kw = filter.width();
    let kh = filter.height();
    let cx = (kw / 2) as isize;
    let cy = (kh / 2) as isize;
    let weights = filter.weights();

    let mut out = OwnedImage::zeros(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f64;
            for i in 0..kh {
                let sy = y as isize + cy - i as isize;
                let base = i * kw;
                for j in 0..kw {
                    let sx = x as isize + cx - j as isize;
                    acc += weights[base + j] * sample(&image, sx, sy, border);
                }
            }
            out.set(x, y, acc);
        }
    }
    Ok(out)
}

fn check_kernel_1d(kernel: &[f64]) -> FeatVoteResult<()> {
    if kernel.is_empty() || kernel.len() % 2 == 0 {
        return Err(FeatVoteError::InvalidInput {
            reason: "1D kernel length must be odd",
        });
    }
    Ok(())
}

/// Convolves each row with `row`, then each column of the result with `col`.
///
/// Equivalent to [`convolve2d`] with `Filter2d::outer(row, col)` up to
/// floating-point rounding, at `O(len(row) + len(col))` per pixel.
pub fn convolve_separable(
    image: ImageView<'_, f64>,
    row: &[f64],
    col: &[f64],
    border: BorderMode,
) -> FeatVoteResult<OwnedImage> {
    check_kernel_1d(row)?;
    check_kernel_1d(col)?;

    let w = image.width();
    let h = image.height();

    let half = (row.len() / 2) as isize;
    let mut tmp = OwnedImage::zeros(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f64;
            for (j, &kv) in row.iter().enumerate() {
                let sx = x as isize + half - j as isize;
                acc += kv * sample(&image, sx, y as isize, border);
            }
            tmp.set(x, y, acc);
        }
    }

    let half = (col.len() / 2) as isize;
    let src = tmp.view();
    let mut out = OwnedImage::zeros(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f64;
            for (i, &kv) in col.iter().enumerate() {
                let sy = y as isize + half - i as isize;
                acc += kv * sample(&src, x as isize, sy, border);
            }
            out.set(x, y, acc);
        }
    }
    Ok(out)
}
