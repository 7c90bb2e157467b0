//! Command-line arguments

use crate::BlurJob;
use gaussblur_filter::{BorderMode, GaussianParams, params};
use gaussblur_io::DEFAULT_JPEG_QUALITY;
use std::path::PathBuf;

/// Default input path when none is given.
pub const DEFAULT_INPUT: &str = "input.jpg";

/// Default output path when none is given.
pub const DEFAULT_OUTPUT: &str = "output.jpg";

#[derive(argh::FromArgs, Debug)]
/// Apply a 2D Gaussian blur to an image, writing the format named by the output extension
pub struct Args {
    /// image to read (default: input.jpg)
    #[argh(positional, default = "PathBuf::from(DEFAULT_INPUT)")]
    pub input: PathBuf,

    /// image to write (default: output.jpg)
    #[argh(positional, default = "PathBuf::from(DEFAULT_OUTPUT)")]
    pub output: PathBuf,

    /// kernel width in pixels (default: 8)
    #[argh(option, default = "params::DEFAULT_KERNEL_SIZE")]
    pub width: u32,

    /// kernel height in pixels (default: 8)
    #[argh(option, default = "params::DEFAULT_KERNEL_SIZE")]
    pub height: u32,

    /// standard deviation on both axes (default: 1.5)
    #[argh(option)]
    pub sigma: Option<f64>,

    /// standard deviation along x, overrides --sigma
    #[argh(option)]
    pub sigma_x: Option<f64>,

    /// standard deviation along y, overrides --sigma
    #[argh(option)]
    pub sigma_y: Option<f64>,

    /// border handling: replicate or reflect101 (default: replicate)
    #[argh(option, default = "BorderMode::Replicate")]
    pub border: BorderMode,

    /// JPEG output quality 1-100 (default: 95)
    #[argh(option, default = "DEFAULT_JPEG_QUALITY")]
    pub quality: u8,
}

impl Args {
    /// Turn parsed arguments into a job. Values are validated by [`crate::run`].
    pub fn into_job(self) -> BlurJob {
        let sigma = self.sigma.unwrap_or(params::DEFAULT_SIGMA);
        let params = GaussianParams::default()
            .with_size(self.width, self.height)
            .with_sigma_x(self.sigma_x.unwrap_or(sigma))
            .with_sigma_y(self.sigma_y.unwrap_or(sigma))
            .with_border(self.border);

        BlurJob {
            input: self.input,
            output: self.output,
            params,
            jpeg_quality: self.quality,
        }
    }
}
