#![cfg(feature = "rayon")]

use featvote::kernel::rayon::RayonKernel;
use featvote::lowlevel::{harris_response, Kernel, ScalarKernel};
use featvote::{
    detect_interest_points, match_features, DescriptorSet, DetectorConfig, HarrisConfig,
    MatchConfig, ObjectDetector, OwnedImage,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> OwnedImage {
    OwnedImage::from_fn(width, height, |_, _| rng.random::<f64>()).unwrap()
}

#[test]
fn corner_response_is_bit_identical() {
    let mut rng = StdRng::seed_from_u64(21);
    let dx = random_image(&mut rng, 37, 29);
    let dy = random_image(&mut rng, 37, 29);
    for radius in [0, 2, 4] {
        let seq = ScalarKernel::corner_response(&dx, &dy, radius, 0.05).unwrap();
        let par = RayonKernel::corner_response(&dx, &dy, radius, 0.05).unwrap();
        assert_eq!(seq, par);
    }
}

#[test]
fn parallel_detection_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(8);
    let img = random_image(&mut rng, 64, 48);
    let seq_cfg = HarrisConfig::default();
    let par_cfg = HarrisConfig {
        parallel: true,
        ..HarrisConfig::default()
    };
    assert_eq!(
        harris_response(img.view(), &seq_cfg).unwrap(),
        harris_response(img.view(), &par_cfg).unwrap()
    );
    assert_eq!(
        detect_interest_points(img.view(), &seq_cfg).unwrap(),
        detect_interest_points(img.view(), &par_cfg).unwrap()
    );
}

#[test]
fn parallel_matching_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(99);
    let a = DescriptorSet::new(72, (0..72 * 40).map(|_| rng.random::<f64>()).collect()).unwrap();
    let b = DescriptorSet::new(72, (0..72 * 25).map(|_| rng.random::<f64>()).collect()).unwrap();
    let seq = match_features(&a, &[], &b, &[], &MatchConfig::default()).unwrap();
    let par = match_features(
        &a,
        &[],
        &b,
        &[],
        &MatchConfig {
            parallel: true,
            ..MatchConfig::default()
        },
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn parallel_templates_match_sequential() {
    let template = OwnedImage::from_fn(20, 20, |x, y| (x + y) as f64 / 38.0).unwrap();
    let left = OwnedImage::from_fn(20, 20, |x, _| if x < 16 { 1.0 } else { 0.0 }).unwrap();
    let full = OwnedImage::from_fn(20, 20, |_, _| 1.0).unwrap();
    let test = OwnedImage::from_fn(100, 100, |x, y| {
        if x >= 50 && y >= 30 {
            template.get(x - 50, y - 30).unwrap_or(0.0)
        } else {
            0.0
        }
    })
    .unwrap();

    let templates = [template.view(), template.view()];
    let masks = [full.view(), left.view()];
    let seq = ObjectDetector::new()
        .detect(&templates, &masks, test.view())
        .unwrap();

    let mut cfg = DetectorConfig {
        parallel: true,
        ..DetectorConfig::default()
    };
    cfg.harris.parallel = true;
    cfg.matching.parallel = true;
    let par = ObjectDetector::with_config(cfg)
        .detect(&templates, &masks, test.view())
        .unwrap();
    assert_eq!(seq, par);
}
