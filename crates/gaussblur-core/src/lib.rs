//! gaussblur core - Basic image container for the Gaussian filter
//!
//! This crate provides the data structures shared by the other
//! gaussblur crates:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable)
//! - [`PixelDepth`] - 8 bpp gray or 32 bpp RGB
//! - [`ImageFormat`] - File formats known to the I/O layer
//! - [`color`] - Packing helpers for 32-bit RGB pixels

pub mod error;
pub mod pix;

pub use error::{Error, Result};
pub use pix::{ImageFormat, Pix, PixMut, PixelDepth};

/// Color channel indices and helper functions for 32-bit RGB pixels.
///
/// # Pixel format
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
/// The alpha byte is kept at 255 for images produced by this workspace.
pub mod color {
    /// Red channel (MSB, byte 0)
    pub const RED: usize = 0;
    /// Green channel (byte 1)
    pub const GREEN: usize = 1;
    /// Blue channel (byte 2)
    pub const BLUE: usize = 2;

    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Shift for each color channel, indexed by [`RED`], [`GREEN`], [`BLUE`].
    pub const CHANNEL_SHIFTS: [u32; 3] = [RED_SHIFT, GREEN_SHIFT, BLUE_SHIFT];

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract a color channel by index (0 = red, 1 = green, 2 = blue).
    ///
    /// # Panics
    ///
    /// Panics if `channel > 2`.
    #[inline]
    pub fn channel(pixel: u32, channel: usize) -> u8 {
        ((pixel >> CHANNEL_SHIFTS[channel]) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | (255 << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

}
