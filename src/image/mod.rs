//! Image views and owned intensity buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! `OwnedImage` is the contiguous `f64` buffer every pipeline stage produces.
//! Intensities are expected in `[0, 1]` but nothing enforces it.

use crate::util::{FeatVoteError, FeatVoteResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> FeatVoteResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> FeatVoteResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(FeatVoteError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> FeatVoteResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(FeatVoteError::InvalidDimensions { width, height });
        }
        let fits = x
            .checked_add(width)
            .zip(y.checked_add(height))
            .is_some_and(|(end_x, end_y)| end_x <= self.width && end_y <= self.height);
        if !fits {
            return Err(FeatVoteError::InvalidInput {
                reason: "roi exceeds image bounds",
            });
        }
        let start = y * self.stride + x;
        let data = self
            .data
            .get(start..)
            .ok_or(FeatVoteError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;
        ImageView::new(data, width, height, self.stride)
    }

    /// Returns true when both views have the same width and height.
    pub fn same_shape<U>(&self, other: &ImageView<'_, U>) -> bool {
        self.width == other.width() && self.height == other.height()
    }
}

impl ImageView<'_, f64> {
    /// Returns the intensity at `(x, y)` or `0.0` outside the image.
    #[inline]
    pub(crate) fn value_or_zero(&self, x: isize, y: isize) -> f64 {
        if x < 0 || y < 0 {
            return 0.0;
        }
        self.get(x as usize, y as usize).copied().unwrap_or(0.0)
    }
}

/// Owned contiguous `f64` image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer of exactly `width * height` values.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> FeatVoteResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(FeatVoteError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(FeatVoteError::InvalidInput {
                reason: "buffer longer than width * height",
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image filled with zeros.
    pub fn zeros(width: usize, height: usize) -> FeatVoteResult<Self> {
        let needed = required_len(width, height, width)?;
        Ok(Self {
            data: vec![0.0; needed],
            width,
            height,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel in raster order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> FeatVoteResult<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let needed = required_len(width, height, width)?;
        let mut data = Vec::with_capacity(needed);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds an image from nested rows.
    ///
    /// Every row must have the same non-zero length; ragged input is not a
    /// 2D grayscale image and is rejected.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> FeatVoteResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let needed = required_len(width, height, width)?;
        let mut data = Vec::with_capacity(needed);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(FeatVoteError::InvalidInput {
                    reason: "image rows must share one length",
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, f64>) -> FeatVoteResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(required_len(width, height, width)?);
        for y in 0..height {
            let row = view.row(y).ok_or(FeatVoteError::BufferTooSmall {
                needed: y * view.stride() + width,
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, f64> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel buffer in row-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Consumes the image and returns its buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.width + x] = value;
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Multiplies an image by a same-sized mask element-wise.
///
/// Masks are usually binary (`0.0` background, `1.0` foreground) but any
/// weights are accepted.
pub fn apply_mask(
    image: ImageView<'_, f64>,
    mask: ImageView<'_, f64>,
) -> FeatVoteResult<OwnedImage> {
    if !image.same_shape(&mask) {
        return Err(FeatVoteError::ShapeMismatch {
            expected_width: image.width(),
            expected_height: image.height(),
            width: mask.width(),
            height: mask.height(),
        });
    }
    let mut out = OwnedImage::zeros(image.width(), image.height())?;
    for y in 0..image.height() {
        let (Some(src), Some(weights)) = (image.row(y), mask.row(y)) else {
            return Err(FeatVoteError::BufferTooSmall {
                needed: y * image.stride() + image.width(),
                got: image.as_slice().len(),
            });
        };
        let start = y * image.width();
        let dst = &mut out.data_mut()[start..start + image.width()];
        for ((d, &v), &w) in dst.iter_mut().zip(src).zip(weights) {
            *d = v * w;
        }
    }
    Ok(out)
}

fn required_len(width: usize, height: usize, stride: usize) -> FeatVoteResult<usize> {
    if width == 0 || height == 0 {
        return Err(FeatVoteError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(FeatVoteError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(FeatVoteError::InvalidDimensions { width, height })
}
