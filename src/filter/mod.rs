//! Convolution, denoising and gradient primitives.
//!
//! Every function preserves the input dimensions. Two border policies are
//! supported: zero padding and mirror padding (edge pixel repeated).

mod border;
mod conv;
mod gradient;

pub use border::{map_index, BorderMode};
pub use conv::{convolve2d, convolve_separable, Filter2d};
pub use gradient::{gaussian_blur, gaussian_kernel_1d, sobel_gradients};
