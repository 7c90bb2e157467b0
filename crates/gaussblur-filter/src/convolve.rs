//! Convolution operations
//!
//! Direct 2D convolution of 8 bpp grayscale and 32 bpp RGB images. The
//! kernel anchor `(cx, cy)` sits on the output pixel, so each output sample
//! is
//!
//! ```text
//! out(x, y) = Σ k(kx, ky) · src(x + kx - cx, y + ky - cy)
//! ```
//!
//! summed in row-major kernel order in `f64`, rounded to nearest and
//! clamped to `[0, 255]`. Source coordinates falling outside the image are
//! resolved per axis by a [`BorderMode`].

use crate::{FilterError, FilterResult, GaussianParams, Kernel};
use gaussblur_core::{Pix, PixelDepth, color};

/// How source coordinates outside the image are mapped back inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Clamp to the nearest edge pixel (`aaa|abcd|ddd`)
    #[default]
    Replicate,
    /// Mirror around the edge pixel without repeating it (`dcb|abcd|cba`)
    Reflect101,
}

impl BorderMode {
    /// Map a possibly out-of-range coordinate into `[0, size)`.
    pub fn resolve(self, coord: i64, size: u32) -> u32 {
        let last = size as i64 - 1;
        match self {
            BorderMode::Replicate => coord.clamp(0, last) as u32,
            BorderMode::Reflect101 => {
                if last <= 0 {
                    return 0;
                }
                // Mirroring is periodic with period 2 * (size - 1)
                let period = 2 * last;
                let c = coord.rem_euclid(period);
                (if c > last { period - c } else { c }) as u32
            }
        }
    }

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            BorderMode::Replicate => "replicate",
            BorderMode::Reflect101 => "reflect101",
        }
    }
}

impl std::str::FromStr for BorderMode {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "replicate" => Ok(BorderMode::Replicate),
            "reflect101" | "reflect-101" | "reflect_101" => Ok(BorderMode::Reflect101),
            other => Err(FilterError::InvalidParameter(format!(
                "unknown border mode '{}' (expected replicate or reflect101)",
                other
            ))),
        }
    }
}

/// Source index table for one axis: chunk `i` of `ksize` entries holds the
/// source coordinates read by output position `i`, one per kernel offset.
fn source_table(size: u32, ksize: u32, anchor: u32, border: BorderMode) -> Vec<u32> {
    let mut table = Vec::with_capacity(size as usize * ksize as usize);
    for i in 0..size as i64 {
        for k in 0..ksize as i64 {
            table.push(border.resolve(i + k - anchor as i64, size));
        }
    }
    table
}

/// Convolve an 8-bit grayscale image with a kernel
///
/// Uses replicate (clamp) border handling: pixels outside the image boundary
/// are treated as having the same value as the nearest edge pixel.
pub fn convolve_gray(pix: &Pix, kernel: &Kernel) -> FilterResult<Pix> {
    convolve_gray_with(pix, kernel, BorderMode::Replicate)
}

fn convolve_gray_with(pix: &Pix, kernel: &Kernel, border: BorderMode) -> FilterResult<Pix> {
    check_grayscale(pix)?;

    let w = pix.width();
    let h = pix.height();
    let kw = kernel.width();
    let kh = kernel.height();
    let xs = source_table(w, kw, kernel.center_x(), border);
    let ys = source_table(h, kh, kernel.center_y(), border);
    let weights = kernel.data();

    let mut out_mut = pix.create_template();

    for (y, yrow) in (0..h).zip(ys.chunks_exact(kh as usize)) {
        for (x, xrow) in (0..w).zip(xs.chunks_exact(kw as usize)) {
            let mut sum = 0.0f64;

            for (krow, &sy) in weights.chunks_exact(kw as usize).zip(yrow) {
                for (&k, &sx) in krow.iter().zip(xrow) {
                    sum += k * pix.get_pixel_unchecked(sx, sy) as f64;
                }
            }

            let result = sum.round().clamp(0.0, 255.0) as u32;
            out_mut.set_pixel_unchecked(x, y, result);
        }
    }

    Ok(out_mut.into())
}

/// Convolve a 32-bit color image with a kernel
///
/// Each of the red, green and blue channels is convolved independently
/// with replicate border handling. The output alpha byte is 255.
pub fn convolve_color(pix: &Pix, kernel: &Kernel) -> FilterResult<Pix> {
    convolve_color_with(pix, kernel, BorderMode::Replicate)
}

fn convolve_color_with(pix: &Pix, kernel: &Kernel, border: BorderMode) -> FilterResult<Pix> {
    check_color(pix)?;

    let w = pix.width();
    let h = pix.height();
    let kw = kernel.width();
    let kh = kernel.height();
    let xs = source_table(w, kw, kernel.center_x(), border);
    let ys = source_table(h, kh, kernel.center_y(), border);
    let weights = kernel.data();

    let mut out_mut = pix.create_template();

    for (y, yrow) in (0..h).zip(ys.chunks_exact(kh as usize)) {
        for (x, xrow) in (0..w).zip(xs.chunks_exact(kw as usize)) {
            let mut sums = [0.0f64; 3];

            for (krow, &sy) in weights.chunks_exact(kw as usize).zip(yrow) {
                for (&k, &sx) in krow.iter().zip(xrow) {
                    let pixel = pix.get_pixel_unchecked(sx, sy);
                    for (c, sum) in sums.iter_mut().enumerate() {
                        *sum += k * color::channel(pixel, c) as f64;
                    }
                }
            }

            let [r, g, b] = sums.map(|s| s.round().clamp(0.0, 255.0) as u8);
            out_mut.set_pixel_unchecked(x, y, color::compose_rgb(r, g, b));
        }
    }

    Ok(out_mut.into())
}

/// Convolve an image (auto-dispatch based on depth) with replicate borders
pub fn convolve(pix: &Pix, kernel: &Kernel) -> FilterResult<Pix> {
    convolve_with_border(pix, kernel, BorderMode::Replicate)
}

/// Convolve an image (auto-dispatch based on depth) with the given border mode
pub fn convolve_with_border(pix: &Pix, kernel: &Kernel, border: BorderMode) -> FilterResult<Pix> {
    log::debug!(
        "convolving {}x{} {} bpp image with {}x{} kernel, {} border",
        pix.width(),
        pix.height(),
        pix.depth().bits(),
        kernel.width(),
        kernel.height(),
        border.name()
    );
    match pix.depth() {
        PixelDepth::Bit8 => convolve_gray_with(pix, kernel, border),
        PixelDepth::Bit32 => convolve_color_with(pix, kernel, border),
    }
}

/// Apply a Gaussian blur
///
/// Builds the kernel described by `params` and convolves with its border
/// mode.
pub fn gaussian_blur(pix: &Pix, params: &GaussianParams) -> FilterResult<Pix> {
    let kernel = params.kernel()?;
    convolve_with_border(pix, &kernel, params.border)
}

fn check_grayscale(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8-bpp grayscale",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

fn check_color(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit32 {
        return Err(FilterError::UnsupportedDepth {
            expected: "32-bpp color",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}
