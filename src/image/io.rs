//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Intensities are scaled to
//! `[0, 1]`; color input is reduced to luminance with fixed channel weights.

use crate::image::OwnedImage;
use crate::util::{FeatVoteError, FeatVoteResult};
use std::path::Path;

const RGB_WEIGHTS: [f64; 3] = [0.29894, 0.58704, 0.11402];

/// Creates an owned image from an 8-bit grayscale buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> FeatVoteResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.as_raw().iter().map(|&v| f64::from(v) / 255.0).collect();
    OwnedImage::new(data, width, height)
}

/// Creates an owned grayscale image from an 8-bit RGB buffer.
pub fn owned_from_rgb_image(img: &image::RgbImage) -> FeatVoteResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .pixels()
        .map(|px| {
            let [r, g, b] = px.0;
            (f64::from(r) * RGB_WEIGHTS[0]
                + f64::from(g) * RGB_WEIGHTS[1]
                + f64::from(b) * RGB_WEIGHTS[2])
                / 255.0
        })
        .collect();
    OwnedImage::new(data, width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> FeatVoteResult<OwnedImage> {
    if img.color().has_color() {
        owned_from_rgb_image(&img.to_rgb8())
    } else {
        owned_from_gray_image(&img.to_luma8())
    }
}

/// Loads an image from disk and converts it to a normalized grayscale image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> FeatVoteResult<OwnedImage> {
    let img = image::open(path).map_err(|err| FeatVoteError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

#[cfg(test)]
mod tests {
    use super::{owned_from_dynamic_image, owned_from_gray_image, owned_from_rgb_image};

    #[test]
    fn gray_buffer_is_normalized() {
        let img = image::GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
        let owned = owned_from_gray_image(&img).unwrap();
        assert_eq!(owned.data(), &[0.0, 1.0]);
    }

    #[test]
    fn rgb_buffer_uses_luminance_weights() {
        let img = image::RgbImage::from_raw(1, 1, vec![255, 0, 0]).unwrap();
        let owned = owned_from_rgb_image(&img).unwrap();
        assert!((owned.data()[0] - 0.29894).abs() < 1e-12);

        let dynamic = image::DynamicImage::ImageRgb8(img);
        let owned = owned_from_dynamic_image(&dynamic).unwrap();
        assert!((owned.data()[0] - 0.29894).abs() < 1e-12);
    }
}
