//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//!
//! # Pixel packing
//!
//! 8 bpp pixels are packed MSB-to-LSB within each 32-bit word, so pixel 0
//! of a row occupies bits 31..24 of the first word. 32 bpp pixels occupy
//! one word each.

use super::{Pix, PixMut, PixData, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

impl PixData {
    #[inline]
    fn get(&self, x: u32, y: u32) -> u32 {
        let wpl = self.wpl as usize;
        let line = &self.data[y as usize * wpl..][..wpl];
        match self.depth {
            PixelDepth::Bit8 => get_data_byte(line, x),
            PixelDepth::Bit32 => line[x as usize],
        }
    }

    #[inline]
    fn set(&mut self, x: u32, y: u32, val: u32) {
        let wpl = self.wpl as usize;
        let line = &mut self.data[y as usize * wpl..][..wpl];
        match self.depth {
            PixelDepth::Bit8 => set_data_byte(line, x, val),
            PixelDepth::Bit32 => line[x as usize] = val,
        }
    }

    #[inline]
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        Ok(())
    }
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner.in_bounds(x, y).then(|| self.inner.get(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the backing buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.get(x, y)
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.inner.depth != PixelDepth::Bit32 {
            return None;
        }
        self.get_pixel(x, y).map(color::extract_rgb)
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.inner.in_bounds(x, y).then(|| self.inner.get(x, y))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.get(x, y)
    }

    /// Set a pixel value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        self.inner.check_bounds(x, y)?;
        self.inner.set(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the backing buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        self.inner.set(x, y, val);
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.inner.depth != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.inner.depth.bits()));
        }
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }
}

/// Get an 8-bit pixel value from a packed line.
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    let shift = 24 - 8 * (x & 3);
    (line[(x >> 2) as usize] >> shift) & 0xff
}

/// Set an 8-bit pixel value in a packed line.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let shift = 24 - 8 * (x & 3);
    let word = &mut line[(x >> 2) as usize];
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}
