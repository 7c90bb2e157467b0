//! Depth conversion

use super::{Pix, PixMut, PixelDepth};
use crate::error::Result;

impl Pix {
    /// Convert to 32 bpp RGB.
    ///
    /// 8 bpp gray values are replicated into R, G and B. A 32 bpp source is
    /// returned as a shared clone, since no pixel changes.
    pub fn convert_to_32(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit32 => Ok(self.clone()),
            PixelDepth::Bit8 => {
                let w = self.width();
                let h = self.height();
                let mut result = PixMut::new(w, h, PixelDepth::Bit32)?;
                result.set_informat(self.informat());

                // Build LUT: gray -> RGB
                let mut tab = [0u32; 256];
                for (i, entry) in tab.iter_mut().enumerate() {
                    let v = i as u8;
                    *entry = crate::color::compose_rgb(v, v, v);
                }

                for y in 0..h {
                    for x in 0..w {
                        let val = self.get_pixel_unchecked(x, y) as usize;
                        result.set_pixel_unchecked(x, y, tab[val]);
                    }
                }
                Ok(result.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[test]
    fn test_convert_8_to_32() {
        let mut pix = PixMut::new(3, 2, PixelDepth::Bit8).unwrap();
        pix.set_pixel(0, 0, 0).unwrap();
        pix.set_pixel(1, 0, 128).unwrap();
        pix.set_pixel(2, 1, 255).unwrap();
        let pix: Pix = pix.into();

        let pix32 = pix.convert_to_32().unwrap();
        assert_eq!(pix32.depth(), PixelDepth::Bit32);
        assert_eq!(pix32.spp(), 3);
        assert_eq!(pix32.get_rgb(1, 0), Some((128, 128, 128)));
        assert_eq!(pix32.get_pixel(2, 1), Some(color::compose_rgb(255, 255, 255)));
    }

    #[test]
    fn test_convert_32_is_shared() {
        let pix = Pix::new(2, 2, PixelDepth::Bit32).unwrap();
        let same = pix.convert_to_32().unwrap();
        assert_eq!(pix.data().as_ptr(), same.data().as_ptr());
    }
}
