//! PIX - The main image container
//!
//! The `Pix` structure is the image type passed between the decoder,
//! the convolution engine and the encoder.
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary
//! - 8 bpp pixels are packed MSB to LSB, four per word
//! - For 32-bit images, color order is RGBA (red in MSB)
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for efficient cloning (shared ownership).
//! To modify pixel data, copy into a `PixMut` via [`Pix::to_mut`] or
//! [`Pix::create_template`], then convert back with `Into<Pix>`.

mod access;
mod convert;

pub use access::*;

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 8-bit grayscale
    Bit8 = 8,
    /// 32-bit RGB
    Bit32 = 32,
}

impl PixelDepth {
    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// BMP format
    Bmp,
    /// JFIF JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// PNM format (PGM / PPM)
    Pnm,
}

impl ImageFormat {
    /// Get the canonical file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Bmp => "bmp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Pnm => "pnm",
        }
    }

    /// Map a file extension (case-insensitive, without the dot) to a format.
    ///
    /// Returns [`ImageFormat::Unknown`] for anything unrecognized.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "bmp" => Self::Bmp,
            "jpg" | "jpeg" | "jpe" | "jfif" => Self::Jpeg,
            "png" => Self::Png,
            "pnm" | "ppm" | "pgm" => Self::Pnm,
            _ => Self::Unknown,
        }
    }

    /// Infer the format from the extension of a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }
}

/// Internal PIX data
#[derive(Debug)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// Samples per pixel (1 for grayscale, 3 for RGB)
    spp: u32,
    /// 32-bit words per line
    wpl: u32,
    /// Input file format
    informat: ImageFormat,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

impl PixData {
    fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let wpl = compute_wpl(width, depth)?;
        // The buffer's byte length must stay within isize::MAX
        let data_size = (wpl as usize)
            .checked_mul(height as usize)
            .filter(|&words| words <= isize::MAX as usize / std::mem::size_of::<u32>())
            .ok_or(Error::InvalidDimension { width, height })?;
        let mut data = Vec::new();
        data.try_reserve_exact(data_size)
            .map_err(|_| Error::InvalidDimension { width, height })?;
        data.resize(data_size, 0u32);

        let spp = match depth {
            PixelDepth::Bit32 => 3,
            PixelDepth::Bit8 => 1,
        };

        Ok(PixData {
            width,
            height,
            depth,
            spp,
            wpl,
            informat: ImageFormat::Unknown,
            data,
        })
    }
}

/// Compute words per line for given width and depth.
///
/// Uses u64 arithmetic to prevent overflow for large widths.
#[inline]
fn compute_wpl(width: u32, depth: PixelDepth) -> Result<u32> {
    let bits_per_line = u64::from(width) * u64::from(depth.bits());
    u32::try_from(bits_per_line.div_ceil(32)).map_err(|_| Error::InvalidDimension {
        width,
        height: 0,
    })
}

/// PIX - Main image container
///
/// `Pix` uses reference counting via `Arc` for efficient cloning.
///
/// # Examples
///
/// ```
/// use gaussblur_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(640, 480, PixelDepth::Bit32).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.height(), 480);
/// assert_eq!(pix.spp(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(Pix {
            inner: Arc::new(PixData::new(width, height, depth)?),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Create a new zeroed PIX with the same dimensions, depth, spp and
    /// input format as the source.
    pub fn create_template(&self) -> PixMut {
        PixMut {
            inner: PixData {
                width: self.inner.width,
                height: self.inner.height,
                depth: self.inner.depth,
                spp: self.inner.spp,
                wpl: self.inner.wpl,
                informat: self.inner.informat,
                data: vec![0u32; self.inner.data.len()],
            },
        }
    }

    /// Check if two PIX have the same width, height, and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Create a mutable copy of this PIX.
    ///
    /// Always creates a new copy that can be modified.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: PixData {
                width: self.inner.width,
                height: self.inner.height,
                depth: self.inner.depth,
                spp: self.inner.spp,
                wpl: self.inner.wpl,
                informat: self.inner.informat,
                data: self.inner.data.clone(),
            },
        }
    }
}

/// Mutable PIX
///
/// Allows modification of image data. Convert back to an immutable
/// [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Create a new zeroed, exclusively owned image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or if
    /// the pixel buffer cannot be allocated.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(PixMut {
            inner: PixData::new(width, height, depth)?,
        })
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Set the input format.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Set every pixel to `val`.
    ///
    /// For 8 bpp the value is truncated to a byte; for 32 bpp it is the
    /// full packed word.
    pub fn set_all_arbitrary(&mut self, val: u32) {
        let word = match self.inner.depth {
            PixelDepth::Bit8 => {
                let b = val & 0xff;
                (b << 24) | (b << 16) | (b << 8) | b
            }
            PixelDepth::Bit32 => val,
        };
        self.inner.data.fill(word);
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}
