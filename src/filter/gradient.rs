//! Gaussian denoising and Sobel gradient estimation.

use crate::filter::border::BorderMode;
use crate::filter::conv::{convolve2d, convolve_separable, Filter2d};
use crate::image::{ImageView, OwnedImage};
use crate::util::{FeatVoteError, FeatVoteResult};

/// Normalized 1D Gaussian sampled on `[-ceil(3 sigma), ceil(3 sigma)]`.
pub fn gaussian_kernel_1d(sigma: f64) -> FeatVoteResult<Vec<f64>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FeatVoteError::InvalidInput {
            reason: "gaussian sigma must be positive and finite",
        });
    }
    let radius = (3.0 * sigma).ceil() as i64;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    Ok(kernel)
}

/// Blurs an image with a separable Gaussian of standard deviation `sigma`,
/// reading zeros beyond the border.
pub fn gaussian_blur(image: ImageView<'_, f64>, sigma: f64) -> FeatVoteResult<OwnedImage> {
    let kernel = gaussian_kernel_1d(sigma)?;
    convolve_separable(image, &kernel, &kernel, BorderMode::Zero)
}

/// Estimates horizontal and vertical gradients with the 3x3 Sobel operator.
///
/// `dx` grows with intensity to the right, `dy` with intensity downward.
/// Samples beyond the border read as zero, so an object touching the image
/// edge produces a step there.
pub fn sobel_gradients(image: ImageView<'_, f64>) -> FeatVoteResult<(OwnedImage, OwnedImage)> {
    let dx = convolve2d(image, &Filter2d::sobel_x(), BorderMode::Zero)?;
    let dy = convolve2d(image, &Filter2d::sobel_y(), BorderMode::Zero)?;
    Ok((dx, dy))
}
