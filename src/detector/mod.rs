//! Template-based object detection.
//!
//! Each template is masked, described and matched against the test image; the
//! Hough winner places a template-sized box, and the boxes of all templates
//! that produced a translation are averaged.

mod bbox;

pub use bbox::BoundingBox;

use crate::descriptor::{extract_features, DescriptorConfig, DescriptorSet};
use crate::image::{apply_mask, ImageView};
use crate::interest::{detect_interest_points, HarrisConfig, InterestPoints};
use crate::matching::{match_features, MatchConfig};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{FeatVoteError, FeatVoteResult};
use crate::vote::{hough_vote, Translation, VoteConfig};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration for [`ObjectDetector`].
#[derive(Clone, Debug, Default)]
pub struct DetectorConfig {
    /// Interest point detection, applied to templates and the test image.
    pub harris: HarrisConfig,
    /// Descriptor layout.
    pub descriptor: DescriptorConfig,
    /// Template-to-test matching.
    pub matching: MatchConfig,
    /// Translation voting.
    pub vote: VoteConfig,
    /// Processes templates in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

/// Result of a single template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateDetection {
    /// Winning translation of the template.
    pub translation: Translation,
    /// Accumulated vote weight of the winning bin.
    pub weight: f64,
    /// Template-sized box centered at the translation.
    pub bbox: BoundingBox,
}

/// Averaged box plus the outcome of every template, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Average of the per-template boxes.
    pub bbox: BoundingBox,
    /// `None` for templates whose matches cast no vote.
    pub outcomes: Vec<Option<TemplateDetection>>,
}

/// Points and descriptors of the test image, shared by every template.
struct SceneFeatures {
    points: InterestPoints,
    descriptors: DescriptorSet,
}

/// Detects a single object from a set of masked templates.
#[derive(Clone, Debug, Default)]
pub struct ObjectDetector {
    cfg: DetectorConfig,
}

impl ObjectDetector {
    /// Creates a detector with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector with an explicit configuration.
    pub fn with_config(cfg: DetectorConfig) -> Self {
        Self { cfg }
    }

    /// Returns the detector configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Locates the object shown by `templates` in `test`.
    ///
    /// `masks[i]` selects the foreground of `templates[i]` and must share its
    /// shape. Fails with [`FeatVoteError::NoDetection`] when no template casts
    /// a vote.
    pub fn detect(
        &self,
        templates: &[ImageView<'_, f64>],
        masks: &[ImageView<'_, f64>],
        test: ImageView<'_, f64>,
    ) -> FeatVoteResult<Detection> {
        let _span = trace_span!("detect_object", templates = templates.len()).entered();
        if templates.is_empty() {
            return Err(FeatVoteError::InvalidInput {
                reason: "at least one template is required",
            });
        }
        if templates.len() != masks.len() {
            return Err(FeatVoteError::InvalidInput {
                reason: "templates and masks must have equal length",
            });
        }
        for (template, mask) in templates.iter().zip(masks) {
            if !template.same_shape(mask) {
                return Err(FeatVoteError::ShapeMismatch {
                    expected_width: template.width(),
                    expected_height: template.height(),
                    width: mask.width(),
                    height: mask.height(),
                });
            }
        }

        let points = detect_interest_points(test, &self.cfg.harris)?;
        let descriptors = extract_features(test, &points, &self.cfg.descriptor)?;
        let scene = SceneFeatures {
            points,
            descriptors,
        };

        let outcomes = self.run_templates(templates, masks, &scene)?;
        let bbox = BoundingBox::average(outcomes.iter().flatten().map(|d| &d.bbox))
            .ok_or(FeatVoteError::NoDetection)?;

        trace_event!(
            "detection",
            detected = outcomes.iter().flatten().count(),
            cx = bbox.center().0,
            cy = bbox.center().1
        );
        Ok(Detection { bbox, outcomes })
    }

    #[cfg(feature = "rayon")]
    fn run_templates(
        &self,
        templates: &[ImageView<'_, f64>],
        masks: &[ImageView<'_, f64>],
        scene: &SceneFeatures,
    ) -> FeatVoteResult<Vec<Option<TemplateDetection>>> {
        if self.cfg.parallel {
            return templates
                .par_iter()
                .zip(masks.par_iter())
                .map(|(&template, &mask)| self.detect_template(template, mask, scene))
                .collect();
        }
        self.run_templates_seq(templates, masks, scene)
    }

    #[cfg(not(feature = "rayon"))]
    fn run_templates(
        &self,
        templates: &[ImageView<'_, f64>],
        masks: &[ImageView<'_, f64>],
        scene: &SceneFeatures,
    ) -> FeatVoteResult<Vec<Option<TemplateDetection>>> {
        self.run_templates_seq(templates, masks, scene)
    }

    fn run_templates_seq(
        &self,
        templates: &[ImageView<'_, f64>],
        masks: &[ImageView<'_, f64>],
        scene: &SceneFeatures,
    ) -> FeatVoteResult<Vec<Option<TemplateDetection>>> {
        templates
            .iter()
            .zip(masks)
            .map(|(&template, &mask)| self.detect_template(template, mask, scene))
            .collect()
    }

    fn detect_template(
        &self,
        template: ImageView<'_, f64>,
        mask: ImageView<'_, f64>,
        scene: &SceneFeatures,
    ) -> FeatVoteResult<Option<TemplateDetection>> {
        let _span = trace_span!(
            "template",
            width = template.width(),
            height = template.height()
        )
        .entered();
        let masked = apply_mask(template, mask)?;
        let points = detect_interest_points(masked.view(), &self.cfg.harris)?;
        let descriptors = extract_features(masked.view(), &points, &self.cfg.descriptor)?;
        let matches = match_features(
            &descriptors,
            points.scores(),
            &scene.descriptors,
            scene.points.scores(),
            &self.cfg.matching,
        )?;
        let vote = match hough_vote(&points, &scene.points, &matches, &self.cfg.vote) {
            Ok(vote) => vote,
            Err(FeatVoteError::EmptyVoteSet) => {
                trace_debug!("template_skipped", points = points.len());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let bbox = BoundingBox::from_center(
            vote.translation.tx as f64,
            vote.translation.ty as f64,
            template.width() as f64,
            template.height() as f64,
        );
        Ok(Some(TemplateDetection {
            translation: vote.translation,
            weight: vote.weight,
            bbox,
        }))
    }
}

/// Runs [`ObjectDetector`] with the default configuration and returns the
/// averaged bounding box.
pub fn detect_object(
    templates: &[ImageView<'_, f64>],
    masks: &[ImageView<'_, f64>],
    test: ImageView<'_, f64>,
) -> FeatVoteResult<BoundingBox> {
    ObjectDetector::new()
        .detect(templates, masks, test)
        .map(|d| d.bbox)
}
