//! Convolution kernels
//!
//! A [`Kernel`] is a `height × width` grid of `f64` weights stored in
//! row-major order, addressed as `get(x, y)` with `x` the column and `y`
//! the row. Each kernel carries an integer anchor `(cx, cy)` which the
//! convolution engine aligns with the output pixel.

use crate::{FilterError, FilterResult};

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel (columns)
    width: u32,
    /// Height of the kernel (rows)
    height: u32,
    /// X coordinate of the anchor
    cx: u32,
    /// Y coordinate of the anchor
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f64>,
}

impl Kernel {
    /// Create a new zero-filled kernel with the given dimensions.
    ///
    /// The anchor is placed at `(width / 2, height / 2)`.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "kernel size must be positive, got {}x{}",
                width, height
            )));
        }

        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; width as usize * height as usize],
        })
    }

    /// Create a kernel from row-major weights.
    ///
    /// The weights are used as given, without normalization.
    pub fn from_slice(width: u32, height: u32, data: &[f64]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidParameter(format!(
                "expected {} kernel values, got {}",
                kernel.data.len(),
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Create a normalized Gaussian kernel.
    ///
    /// The kernel has `rows × cols` cells and is centered on the real-valued
    /// point `(cols / 2.0, rows / 2.0)`. Cell `(row i, col j)` gets the weight
    ///
    /// ```text
    /// w = exp(-(x² / 2σx² + y² / 2σy²)),  x = j - cols/2,  y = i - rows/2
    /// ```
    ///
    /// and all weights are divided by their row-major sum afterwards, so the
    /// kernel sums to 1.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`] if either dimension is zero
    /// or either sigma is not a finite positive number, and
    /// [`FilterError::InvalidKernel`] if every weight underflows to zero.
    pub fn gaussian(rows: u32, cols: u32, sigma_x: f64, sigma_y: f64) -> FilterResult<Self> {
        for (name, sigma) in [("sigma_x", sigma_x), ("sigma_y", sigma_y)] {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(FilterError::InvalidParameter(format!(
                    "{} must be finite and positive, got {}",
                    name, sigma
                )));
            }
        }

        let mut kernel = Self::new(cols, rows)?;
        let (center_x, center_y) = kernel.center_point();
        let two_sx2 = 2.0 * sigma_x * sigma_x;
        let two_sy2 = 2.0 * sigma_y * sigma_y;

        for i in 0..rows {
            let y = i as f64 - center_y;
            for j in 0..cols {
                let x = j as f64 - center_x;
                kernel.set(j, i, (-(x * x / two_sx2 + y * y / two_sy2)).exp());
            }
        }
        kernel.normalize()?;

        log::debug!(
            "built {}x{} gaussian kernel, sigma=({}, {})",
            cols,
            rows,
            sigma_x,
            sigma_y
        );
        Ok(kernel)
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the anchor X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the anchor Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Real-valued geometric center `(width / 2.0, height / 2.0)`.
    ///
    /// Equal to the integer anchor for even sizes.
    pub fn center_point(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.data[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Set a value at (x, y). Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f64) {
        if x < self.width && y < self.height {
            self.data[y as usize * self.width as usize + x as usize] = value;
        }
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// The divisor is the row-major sum of the weights.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if the weights sum to zero or
    /// to a non-finite value.
    pub fn normalize(&mut self) -> FilterResult<()> {
        let sum = self.sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(FilterError::InvalidKernel(
                "cannot normalize a kernel summing to zero".to_string(),
            ));
        }
        self.data.iter_mut().for_each(|v| *v /= sum);
        Ok(())
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}
