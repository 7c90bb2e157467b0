//! gaussblur-filter - Gaussian kernel generation and convolution
//!
//! - [`Kernel`]: a 2D weight grid, with [`Kernel::gaussian`] building a
//!   normalized anisotropic Gaussian window
//! - [`convolve`]: direct 2D convolution of 8 bpp and 32 bpp images with
//!   replicate or reflect-101 border handling
//! - [`GaussianParams`]: kernel size, sigmas and border mode for
//!   [`gaussian_blur`]

pub mod convolve;
mod error;
pub mod kernel;
pub mod params;

pub use convolve::{
    BorderMode, convolve, convolve_color, convolve_gray, convolve_with_border, gaussian_blur,
};
pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;
pub use params::GaussianParams;
