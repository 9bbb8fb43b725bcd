//! Error types for featvote.

use thiserror::Error;

/// Result alias for featvote operations.
pub type FeatVoteResult<T> = std::result::Result<T, FeatVoteError>;

/// Errors that can occur when running the detection pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FeatVoteError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride: width {width}, stride {stride}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },
    /// Two images that must share a shape do not.
    #[error("shape mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
    /// Two descriptor sets have different dimensionality.
    #[error("descriptor length mismatch: expected {expected}, got {got}")]
    DescriptorLength { expected: usize, got: usize },
    /// An index does not address a valid element.
    #[error("index {index} out of bounds for {context} (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// Matching was requested against zero candidate descriptors.
    #[error("cannot match against an empty descriptor set")]
    EmptyDescriptorSet,
    /// No translation bin accumulated positive weight.
    #[error("no translation bin received a positive vote")]
    EmptyVoteSet,
    /// None of the templates produced a translation estimate.
    #[error("no template produced a detection")]
    NoDetection,
    /// Image decoding failed.
    #[error("image I/O failed: {reason}")]
    ImageIo { reason: String },
}
