//! Detection over a table of synthetic scenes.
//!
//! Each case pastes a generated template into a black image at a known offset
//! and checks the winning Hough bin against the recorded one. Off-grid offsets
//! spread their votes over neighboring bins, so the winner may lie one bin
//! away from the nearest grid point.

use featvote::{DetectorConfig, ObjectDetector, OwnedImage, Translation};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TemplateSpec {
    Gradient { width: usize, height: usize },
    Checker {
        width: usize,
        height: usize,
        cell: usize,
    },
    Ramp { width: usize, height: usize },
}

impl TemplateSpec {
    fn render(&self) -> OwnedImage {
        match *self {
            TemplateSpec::Gradient { width, height } => {
                let denom = (width + height - 2) as f64;
                OwnedImage::from_fn(width, height, |x, y| (x + y) as f64 / denom).unwrap()
            }
            TemplateSpec::Checker {
                width,
                height,
                cell,
            } => OwnedImage::from_fn(width, height, |x, y| {
                if (x / cell + y / cell) % 2 == 0 {
                    1.0
                } else {
                    0.2
                }
            })
            .unwrap(),
            TemplateSpec::Ramp { width, height } => OwnedImage::from_fn(width, height, |x, _| {
                0.2 + 0.6 * x as f64 / (width - 1) as f64
            })
            .unwrap(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SceneCase {
    case_id: String,
    template: TemplateSpec,
    /// `[width, height]` of the test image.
    image: [usize; 2],
    /// `[x, y]` of the template's top-left corner.
    offset: [usize; 2],
    /// `[tx, ty]` of the expected winning bin.
    expected: [i64; 2],
}

#[derive(Debug, Deserialize)]
struct SceneTable {
    cases: Vec<SceneCase>,
}

fn load_cases() -> Vec<SceneCase> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/scenes.json");
    let text = fs::read_to_string(&path).expect("read scenes.json");
    let table: SceneTable = serde_json::from_str(&text).expect("parse scenes.json");
    table.cases
}

fn paste(template: &OwnedImage, width: usize, height: usize, ox: usize, oy: usize) -> OwnedImage {
    OwnedImage::from_fn(width, height, |x, y| {
        if x >= ox && y >= oy {
            template.get(x - ox, y - oy).unwrap_or(0.0)
        } else {
            0.0
        }
    })
    .unwrap()
}

fn run_case(case: &SceneCase, detector: &ObjectDetector) -> Result<(), String> {
    let template = case.template.render();
    let mask = OwnedImage::from_fn(template.width(), template.height(), |_, _| 1.0).unwrap();
    let [w, h] = case.image;
    let [ox, oy] = case.offset;
    let test = paste(&template, w, h, ox, oy);

    let detection = detector
        .detect(&[template.view()], &[mask.view()], test.view())
        .map_err(|e| format!("detection failed: {e}"))?;
    let outcome = detection.outcomes[0]
        .as_ref()
        .ok_or_else(|| "template cast no vote".to_string())?;

    let expected = Translation {
        tx: case.expected[0],
        ty: case.expected[1],
    };
    if outcome.translation != expected {
        return Err(format!(
            "translation {:?}, expected {:?}",
            outcome.translation, expected
        ));
    }
    let (cx, cy) = detection.bbox.center();
    if (cx - expected.tx as f64).abs() > 1e-9 || (cy - expected.ty as f64).abs() > 1e-9 {
        return Err(format!("box center ({cx}, {cy}) off the winning bin"));
    }
    if (detection.bbox.width() - template.width() as f64).abs() > 1e-9 {
        return Err(format!("box width {}", detection.bbox.width()));
    }
    Ok(())
}

#[test]
fn synthetic_scene_table() {
    let cases = load_cases();
    assert!(!cases.is_empty());

    let detector = ObjectDetector::with_config(DetectorConfig::default());
    let mut failures = Vec::new();
    for case in &cases {
        match run_case(case, &detector) {
            Ok(()) => println!("PASS: {}", case.case_id),
            Err(e) => {
                println!("FAIL: {} - {}", case.case_id, e);
                failures.push(format!("{}: {}", case.case_id, e));
            }
        }
    }
    assert!(failures.is_empty(), "failed cases:\n{}", failures.join("\n"));
}

#[test]
fn expected_bins_lie_on_the_grid_near_the_offset() {
    for case in load_cases() {
        let dx = case.offset[0] as i64 - case.expected[0];
        let dy = case.offset[1] as i64 - case.expected[1];
        assert!(dx.abs() < 5 && dy.abs() < 5, "{}", case.case_id);
        assert_eq!(case.expected[0] % 5, 0);
        assert_eq!(case.expected[1] % 5, 0);
    }
}
