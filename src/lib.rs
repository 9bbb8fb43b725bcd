//! featvote locates an object in a grayscale image from one or more masked
//! templates.
//!
//! The pipeline detects Harris corners, describes them with orientation
//! histograms, matches template descriptors against the test image with a
//! best/second-best ratio score and lets every match vote for a quantized
//! translation. Work is single-threaded by default; the `rayon` feature adds
//! row-, query- and template-parallel paths with identical results.

mod candidate;
pub mod descriptor;
pub mod detector;
pub mod filter;
pub mod image;
pub mod interest;
pub mod kernel;
pub mod lowlevel;
pub mod matching;
mod trace;
pub mod util;
pub mod vote;

pub use descriptor::{extract_features, DescriptorConfig, DescriptorSet};
pub use detector::{
    detect_object, BoundingBox, Detection, DetectorConfig, ObjectDetector, TemplateDetection,
};
pub use image::{apply_mask, ImageView, OwnedImage};
pub use interest::{detect_interest_points, HarrisConfig, InterestPoint, InterestPoints};
pub use matching::{match_features, FeatureMatches, MatchConfig};
pub use util::{FeatVoteError, FeatVoteResult};
pub use vote::{correct_match_pdf, hough_vote, HoughVote, Translation, VoteConfig, VoteTable};
