//! Candidate selection on dense score maps.
//!
//! Includes 3x3 non-maximum suppression and percentile thresholding.

pub(crate) mod nms;
pub(crate) mod threshold;
