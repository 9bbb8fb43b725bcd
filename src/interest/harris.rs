use crate::candidate::nms::suppress_non_maxima_3x3;
use crate::candidate::threshold::percentile_threshold;
use crate::filter::{gaussian_blur, sobel_gradients};
use crate::image::{ImageView, OwnedImage};
use crate::interest::{HarrisConfig, InterestPoints};
use crate::kernel::scalar::ScalarKernel;
use crate::kernel::Kernel;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::FeatVoteResult;

/// Computes the dense Harris response map of `image`.
///
/// The image is smoothed with `cfg.smoothing_sigma`, differentiated with Sobel
/// filters and the second-moment products are summed over the clipped window
/// of half-width [`HarrisConfig::window_radius`].
pub fn harris_response(
    image: ImageView<'_, f64>,
    cfg: &HarrisConfig,
) -> FeatVoteResult<OwnedImage> {
    cfg.validate()?;
    let smoothed = gaussian_blur(image, cfg.smoothing_sigma)?;
    let (dx, dy) = sobel_gradients(smoothed.view())?;
    // A window wider than the image is clipped to the whole image anyway.
    let radius = cfg.window_radius().min(image.width().max(image.height()));
    corner_response(&dx, &dy, radius, cfg)
}

#[cfg(feature = "rayon")]
fn corner_response(
    dx: &OwnedImage,
    dy: &OwnedImage,
    radius: usize,
    cfg: &HarrisConfig,
) -> FeatVoteResult<OwnedImage> {
    use crate::kernel::rayon::RayonKernel;
    if cfg.parallel {
        return RayonKernel::corner_response(dx, dy, radius, cfg.k);
    }
    ScalarKernel::corner_response(dx, dy, radius, cfg.k)
}

#[cfg(not(feature = "rayon"))]
fn corner_response(
    dx: &OwnedImage,
    dy: &OwnedImage,
    radius: usize,
    cfg: &HarrisConfig,
) -> FeatVoteResult<OwnedImage> {
    ScalarKernel::corner_response(dx, dy, radius, cfg.k)
}

/// Detects Harris corners in `image`.
///
/// Returns at most `cfg.max_points` interior points in raster order. Images
/// narrower or shorter than three pixels yield an empty set.
pub fn detect_interest_points(
    image: ImageView<'_, f64>,
    cfg: &HarrisConfig,
) -> FeatVoteResult<InterestPoints> {
    let _span = trace_span!(
        "detect_interest_points",
        width = image.width(),
        height = image.height()
    )
    .entered();
    cfg.validate()?;

    let mut points = InterestPoints::default();
    if cfg.max_points == 0 {
        return Ok(points);
    }

    let response = harris_response(image, cfg)?;
    let suppressed = suppress_non_maxima_3x3(response.view())?;
    let threshold = percentile_threshold(suppressed.view(), cfg.percentile, cfg.max_points);
    trace_debug!("threshold", value = threshold);

    let w = suppressed.width();
    let h = suppressed.height();
    if w >= 3 && h >= 3 {
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let v = suppressed.at(x, y);
                if v > threshold {
                    points.push(x, y, v);
                }
            }
        }
    }

    trace_event!("interest_points", count = points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::{detect_interest_points, harris_response};
    use crate::image::OwnedImage;
    use crate::interest::HarrisConfig;

    fn blob(width: usize, height: usize, cx: usize, cy: usize) -> OwnedImage {
        OwnedImage::from_fn(width, height, |x, y| {
            if x.abs_diff(cx) <= 1 && y.abs_diff(cy) <= 1 {
                1.0
            } else {
                0.0
            }
        })
        .unwrap()
    }

    #[test]
    fn flat_image_only_responds_near_the_border() {
        // The zero-padded blur darkens the image rim, so each image corner
        // turns into a Harris corner. Nothing fires further inside.
        let cfg = HarrisConfig::default();
        let band = 3 + cfg.window_radius();
        for &(w, h) in &[(16usize, 12usize), (40, 30)] {
            let img = OwnedImage::from_fn(w, h, |_, _| 0.5).unwrap();
            let pts = detect_interest_points(img.view(), &cfg).unwrap();
            assert_eq!(pts.len(), 4);
            for p in pts.iter() {
                let dist_x = p.x.min(w - 1 - p.x);
                let dist_y = p.y.min(h - 1 - p.y);
                assert!(dist_x <= band && dist_y <= band, "({}, {})", p.x, p.y);
            }
            let coords: Vec<_> = pts.iter().map(|p| (p.x, p.y)).collect();
            assert_eq!(coords, vec![(2, 2), (w - 3, 2), (2, h - 3), (w - 3, h - 3)]);
        }
    }

    #[test]
    fn square_patch_corners_are_localized() {
        let img = OwnedImage::from_fn(30, 30, |x, y| {
            if (10..20).contains(&x) && (10..20).contains(&y) {
                1.0
            } else {
                0.0
            }
        })
        .unwrap();
        let pts = detect_interest_points(img.view(), &HarrisConfig::default()).unwrap();
        let coords: Vec<_> = pts.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(11, 11), (18, 11), (11, 18), (18, 18)]);
    }

    #[test]
    fn huge_scale_covers_the_whole_image() {
        let img = blob(8, 8, 3, 4);
        let huge = HarrisConfig {
            scale: 1e30,
            ..HarrisConfig::default()
        };
        let wide = HarrisConfig {
            scale: 8.0,
            ..HarrisConfig::default()
        };
        let a = harris_response(img.view(), &huge).unwrap();
        let b = harris_response(img.view(), &wide).unwrap();
        assert_eq!(a.data(), b.data());
        assert!(detect_interest_points(img.view(), &huge).is_ok());
    }

    #[test]
    fn response_keeps_image_shape() {
        let img = blob(21, 17, 8, 9);
        let r = harris_response(img.view(), &HarrisConfig::default()).unwrap();
        assert_eq!((r.width(), r.height()), (21, 17));
    }

    #[test]
    fn single_blob_is_found_at_its_center() {
        let img = blob(30, 30, 10, 10);
        let cfg = HarrisConfig {
            max_points: 1,
            ..HarrisConfig::default()
        };
        let pts = detect_interest_points(img.view(), &cfg).unwrap();
        assert_eq!(pts.len(), 1);
        assert_eq!((pts.xs()[0], pts.ys()[0]), (10, 10));
        assert!(pts.scores()[0] > 0.0);
    }

    #[test]
    fn zero_budget_and_tiny_images_are_empty() {
        let img = blob(30, 30, 10, 10);
        let cfg = HarrisConfig {
            max_points: 0,
            ..HarrisConfig::default()
        };
        let pts = detect_interest_points(img.view(), &cfg).unwrap();
        assert!(pts.is_empty());

        let tiny = OwnedImage::from_fn(2, 2, |x, _| x as f64).unwrap();
        let pts = detect_interest_points(tiny.view(), &HarrisConfig::default()).unwrap();
        assert!(pts.is_empty());
    }

    #[test]
    fn negative_scale_is_rejected() {
        let img = blob(12, 12, 5, 5);
        let cfg = HarrisConfig {
            scale: -0.5,
            ..HarrisConfig::default()
        };
        assert!(detect_interest_points(img.view(), &cfg).is_err());
    }
}
