//! Gaussian blur parameters

use crate::{BorderMode, FilterError, FilterResult, Kernel};

/// Default kernel width and height.
pub const DEFAULT_KERNEL_SIZE: u32 = 8;

/// Default standard deviation along both axes.
pub const DEFAULT_SIGMA: f64 = 1.5;

/// Kernel size, standard deviations and border policy for [`crate::gaussian_blur`].
///
/// ```
/// use gaussblur_filter::{BorderMode, GaussianParams};
///
/// let params = GaussianParams::default()
///     .with_size(5, 5)
///     .with_sigma(2.0)
///     .with_border(BorderMode::Reflect101);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParams {
    /// Kernel width in columns
    pub width: u32,
    /// Kernel height in rows
    pub height: u32,
    /// Standard deviation along x
    pub sigma_x: f64,
    /// Standard deviation along y
    pub sigma_y: f64,
    /// Out-of-range sample policy
    pub border: BorderMode,
}

impl Default for GaussianParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_KERNEL_SIZE,
            height: DEFAULT_KERNEL_SIZE,
            sigma_x: DEFAULT_SIGMA,
            sigma_y: DEFAULT_SIGMA,
            border: BorderMode::default(),
        }
    }
}

impl GaussianParams {
    /// Set kernel width and height.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the same sigma on both axes.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma_x = sigma;
        self.sigma_y = sigma;
        self
    }

    /// Set sigma along x.
    pub fn with_sigma_x(mut self, sigma_x: f64) -> Self {
        self.sigma_x = sigma_x;
        self
    }

    /// Set sigma along y.
    pub fn with_sigma_y(mut self, sigma_y: f64) -> Self {
        self.sigma_y = sigma_y;
        self
    }

    /// Set the border mode.
    pub fn with_border(mut self, border: BorderMode) -> Self {
        self.border = border;
        self
    }

    /// Check sizes and sigmas without building a kernel.
    pub fn validate(&self) -> FilterResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "kernel size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        for (name, sigma) in [("sigma_x", self.sigma_x), ("sigma_y", self.sigma_y)] {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(FilterError::InvalidParameter(format!(
                    "{} must be finite and positive, got {}",
                    name, sigma
                )));
            }
        }
        Ok(())
    }

    /// Build the Gaussian kernel described by these parameters.
    pub fn kernel(&self) -> FilterResult<Kernel> {
        self.validate()?;
        Kernel::gaussian(self.height, self.width, self.sigma_x, self.sigma_y)
    }
}
