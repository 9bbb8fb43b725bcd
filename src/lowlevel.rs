//! Low-level building blocks for custom detection pipelines.
//!
//! These expose the intermediate stages (response maps, suppression, gradient
//! fields, distance kernels and the raw vote accumulator) for callers that
//! want to inspect or recombine them. Most users should prefer
//! [`ObjectDetector`](crate::ObjectDetector) and the top-level stage functions.

pub use crate::candidate::nms::suppress_non_maxima_3x3;
pub use crate::descriptor::GradientField;
pub use crate::filter::{
    convolve2d, convolve_separable, gaussian_blur, gaussian_kernel_1d, sobel_gradients, BorderMode,
    Filter2d,
};
pub use crate::interest::harris_response;
pub use crate::kernel::scalar::ScalarKernel;
pub use crate::kernel::{Kernel, Nearest};
pub use crate::matching::descriptor_distance;
pub use crate::vote::{VoteAccumulator, VoteBin, VoteRule};
