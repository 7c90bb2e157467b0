//! gaussblur - Gaussian blur for image files
//!
//! Reads an image, convolves it with a normalized 2D Gaussian kernel and
//! writes the result. The pieces live in their own crates and are
//! re-exported here:
//!
//! - [`io`]: decoding and encoding (PNG, JPEG, BMP, PNM)
//! - [`filter`]: [`Kernel::gaussian`] and 2D convolution
//!
//! # Example
//!
//! ```
//! use gaussblur::{GaussianParams, Pix, PixMut, PixelDepth, color, gaussian_blur};
//!
//! let mut red = PixMut::new(10, 10, PixelDepth::Bit32).unwrap();
//! red.set_all_arbitrary(color::compose_rgb(255, 0, 0));
//! let red: Pix = red.into();
//!
//! let blurred = gaussian_blur(&red, &GaussianParams::default()).unwrap();
//! assert_eq!(blurred.get_rgb(5, 5), Some((255, 0, 0)));
//! ```

pub mod cli;
mod error;

pub use gaussblur_core::{ImageFormat, Pix, PixMut, PixelDepth, color};
pub use gaussblur_filter as filter;
pub use gaussblur_filter::{BorderMode, GaussianParams, Kernel, gaussian_blur};
pub use gaussblur_io as io;

pub use error::BlurError;

use gaussblur_io::{DEFAULT_JPEG_QUALITY, WriteOptions};
use std::path::PathBuf;

/// One blur invocation: where to read, where to write, and how to blur.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurJob {
    /// Image to read
    pub input: PathBuf,
    /// Image to write; the format follows the extension
    pub output: PathBuf,
    /// Kernel size, sigmas and border mode
    pub params: GaussianParams,
    /// Quality used when the output is JPEG
    pub jpeg_quality: u8,
}

impl BlurJob {
    /// A job with default parameters.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            params: GaussianParams::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Check the blur parameters and JPEG quality.
    pub fn validate(&self) -> Result<(), BlurError> {
        self.params.validate()?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BlurError::InvalidQuality(self.jpeg_quality));
        }
        Ok(())
    }
}

/// Run a blur job end to end.
///
/// Parameters are validated before any file is touched. The input is
/// decoded as 3-channel color, blurred, and encoded in the format named by
/// the output extension.
///
/// # Errors
///
/// - [`BlurError::Filter`] / [`BlurError::InvalidQuality`] for bad parameters
/// - [`BlurError::Decode`] if the input cannot be read or decoded
/// - [`BlurError::Encode`] if the output cannot be encoded or written
pub fn run(job: &BlurJob) -> Result<Pix, BlurError> {
    job.validate()?;

    let pix = gaussblur_io::read_image_color(&job.input).map_err(|source| BlurError::Decode {
        path: job.input.clone(),
        source,
    })?;
    log::debug!(
        "loaded {} ({}x{})",
        job.input.display(),
        pix.width(),
        pix.height()
    );

    let blurred = gaussian_blur(&pix, &job.params)?;

    let options = WriteOptions {
        jpeg_quality: job.jpeg_quality,
    };
    gaussblur_io::write_image_auto(&blurred, &job.output, &options).map_err(|source| {
        BlurError::Encode {
            path: job.output.clone(),
            source,
        }
    })?;

    Ok(blurred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_flat(dir: &std::path::Path, name: &str, r: u8, g: u8, b: u8) -> PathBuf {
        let mut pix = PixMut::new(10, 10, PixelDepth::Bit32).unwrap();
        pix.set_all_arbitrary(color::compose_rgb(r, g, b));
        let path = dir.join(name);
        gaussblur_io::write_image(&pix.into(), &path, ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn test_job_defaults() {
        let job = BlurJob::new("in.png", "out.png");
        assert_eq!(job.params, GaussianParams::default());
        assert_eq!(job.jpeg_quality, 95);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_run_red_image() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_flat(dir.path(), "red.png", 255, 0, 0);
        let output = dir.path().join("out.png");

        let blurred = run(&BlurJob::new(&input, &output)).unwrap();
        assert_eq!(blurred.get_rgb(0, 9), Some((255, 0, 0)));

        let written = gaussblur_io::read_image(&output).unwrap();
        assert_eq!(written.width(), 10);
        assert_eq!(written.height(), 10);
        assert_eq!(written.get_rgb(5, 5), Some((255, 0, 0)));
    }

    #[test]
    fn test_run_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");
        let err = run(&BlurJob::new(dir.path().join("nope.png"), &output)).unwrap_err();
        assert!(matches!(err, BlurError::Decode { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_unknown_output_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_flat(dir.path(), "in.png", 1, 2, 3);
        let err = run(&BlurJob::new(&input, dir.path().join("out.unknown"))).unwrap_err();
        assert!(matches!(err, BlurError::Encode { .. }));
    }

    #[test]
    fn test_run_rejects_bad_params_before_reading() {
        let mut job = BlurJob::new("/nonexistent/in.png", "/nonexistent/out.png");
        job.params = job.params.with_sigma(0.0);
        assert!(matches!(run(&job), Err(BlurError::Filter(_))));

        let mut job = BlurJob::new("/nonexistent/in.png", "/nonexistent/out.png");
        job.jpeg_quality = 0;
        assert!(matches!(run(&job), Err(BlurError::InvalidQuality(0))));
    }
}
