//! PNM (Portable Any Map) format support
//!
//! Reads PGM (P2 ASCII, P5 binary) and PPM (P3 ASCII, P6 binary) images.
//! Writes P5 for 8 bpp images and P6 for 32 bpp images. Samples with a
//! maxval other than 255 are rescaled to 8 bits on read.

use crate::{IoError, IoResult};
use gaussblur_core::{ImageFormat, Pix, PixMut, PixelDepth, color};
use std::io::{Read, Write};

/// Byte cursor over a PNM header and raster.
struct PnmParser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PnmParser<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Skip whitespace and `#` comments running to end of line.
    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn read_uint(&mut self, what: &str) -> IoResult<u32> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .data
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidData(format!("PNM: expected {}", what)));
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IoError::InvalidData(format!("PNM: {} out of range", what)))
    }

    fn read_binary_sample(&mut self, wide: bool) -> IoResult<u32> {
        let len = if wide { 2 } else { 1 };
        let bytes = self
            .data
            .get(self.pos..self.pos + len)
            .ok_or_else(|| IoError::InvalidData("PNM: truncated raster".to_string()))?;
        self.pos += len;
        Ok(if wide {
            u16::from_be_bytes([bytes[0], bytes[1]]) as u32
        } else {
            bytes[0] as u32
        })
    }
}

/// Read a PNM image (P2/P3/P5/P6) from a reader.
///
/// # Returns
/// A `Pix` at 8 bpp (PGM) or 32 bpp (PPM).
pub fn read_pnm<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(IoError::Io)?;

    let magic = data
        .get(..2)
        .ok_or_else(|| IoError::InvalidData("PNM: missing magic".to_string()))?;
    let (ascii, channels) = match magic {
        b"P2" => (true, 1),
        b"P3" => (true, 3),
        b"P5" => (false, 1),
        b"P6" => (false, 3),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM type: {}",
                String::from_utf8_lossy(magic)
            )));
        }
    };

    let mut parser = PnmParser::new(&data);
    parser.pos = 2;
    let width = parser.read_uint("width")?;
    let height = parser.read_uint("height")?;
    let maxval = parser.read_uint("maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!(
            "PNM: invalid maxval {}",
            maxval
        )));
    }

    if !ascii {
        // Exactly one whitespace byte separates the header from the raster
        match data.get(parser.pos) {
            Some(b) if b.is_ascii_whitespace() => parser.pos += 1,
            _ => return Err(IoError::InvalidData("PNM: malformed header".to_string())),
        }
    }

    // Every sample takes at least one byte (two for 16-bit binary)
    let wide = maxval > 255;
    let bytes_per_sample: u64 = if wide && !ascii { 2 } else { 1 };
    let needed = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|n| n.checked_mul(channels * bytes_per_sample))
        .ok_or_else(|| IoError::InvalidData(format!("PNM: {}x{} is too large", width, height)))?;
    if needed > (data.len() - parser.pos) as u64 {
        return Err(IoError::InvalidData("PNM: truncated raster".to_string()));
    }

    let depth = if channels == 1 {
        PixelDepth::Bit8
    } else {
        PixelDepth::Bit32
    };
    let mut pix_mut = PixMut::new(width, height, depth)?;
    pix_mut.set_informat(ImageFormat::Pnm);

    let sample = |parser: &mut PnmParser<'_>| -> IoResult<u8> {
        let v = if ascii {
            parser.read_uint("sample")?
        } else {
            parser.read_binary_sample(wide)?
        };
        if v > maxval {
            return Err(IoError::InvalidData(format!(
                "PNM: sample {} exceeds maxval {}",
                v, maxval
            )));
        }
        Ok(if maxval == 255 {
            v as u8
        } else {
            ((v * 255 + maxval / 2) / maxval) as u8
        })
    };

    for y in 0..height {
        for x in 0..width {
            let value = if channels == 1 {
                sample(&mut parser)? as u32
            } else {
                let r = sample(&mut parser)?;
                let g = sample(&mut parser)?;
                let b = sample(&mut parser)?;
                color::compose_rgb(r, g, b)
            };
            pix_mut.set_pixel_unchecked(x, y, value);
        }
    }

    Ok(pix_mut.into())
}

/// Write a `Pix` as binary PNM to a writer.
///
/// Chooses P5 (8 bpp grayscale) or P6 (32 bpp RGB) based on the pixel depth.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();
    let (magic, samples) = match pix.depth() {
        PixelDepth::Bit8 => ("P5", 1usize),
        PixelDepth::Bit32 => ("P6", 3usize),
    };

    let mut out = format!("{}\n{} {}\n255\n", magic, width, height).into_bytes();
    out.reserve(width as usize * height as usize * samples);
    for y in 0..height {
        for x in 0..width {
            let pixel = pix.get_pixel_unchecked(x, y);
            match pix.depth() {
                PixelDepth::Bit8 => out.push(pixel as u8),
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(pixel);
                    out.extend_from_slice(&[r, g, b]);
                }
            }
        }
    }

    writer.write_all(&out).map_err(IoError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_p2_with_comments() {
        let data = b"P2\n# a comment\n3 2\n# another\n255\n0 10 20\n30 40 255\n";
        let pix = read_pnm(Cursor::new(&data[..])).unwrap();
        assert_eq!(pix.width(), 3);
        assert_eq!(pix.height(), 2);
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert_eq!(pix.informat(), ImageFormat::Pnm);
        assert_eq!(pix.get_pixel(1, 0), Some(10));
        assert_eq!(pix.get_pixel(2, 1), Some(255));
    }

    #[test]
    fn test_read_p3_rescales_maxval() {
        let data = b"P3 2 1 15\n15 0 0  0 15 7\n";
        let pix = read_pnm(Cursor::new(&data[..])).unwrap();
        assert_eq!(pix.depth(), PixelDepth::Bit32);
        assert_eq!(pix.get_rgb(0, 0), Some((255, 0, 0)));
        // 7 * 255 / 15 = 119
        assert_eq!(pix.get_rgb(1, 0), Some((0, 255, 119)));
    }

    #[test]
    fn test_read_p5_16bit() {
        let mut data = b"P5\n2 1\n65535\n".to_vec();
        data.extend_from_slice(&[0xFF, 0xFF, 0x00, 0x00]);
        let pix = read_pnm(Cursor::new(data)).unwrap();
        assert_eq!(pix.get_pixel(0, 0), Some(255));
        assert_eq!(pix.get_pixel(1, 0), Some(0));
    }

    #[test]
    fn test_roundtrip_p6() {
        let mut pix_mut = PixMut::new(3, 2, PixelDepth::Bit32).unwrap();
        pix_mut.set_rgb(0, 0, 1, 2, 3).unwrap();
        pix_mut.set_rgb(2, 1, 250, 128, 10).unwrap();
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_pnm(&pix, &mut buffer).unwrap();
        assert!(buffer.starts_with(b"P6\n3 2\n255\n"));

        let back = read_pnm(Cursor::new(buffer)).unwrap();
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_roundtrip_p5() {
        let mut pix_mut = PixMut::new(4, 1, PixelDepth::Bit8).unwrap();
        for x in 0..4 {
            pix_mut.set_pixel(x, 0, x * 80).unwrap();
        }
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_pnm(&pix, &mut buffer).unwrap();
        assert!(buffer.starts_with(b"P5\n"));
        let back = read_pnm(Cursor::new(buffer)).unwrap();
        for x in 0..4 {
            assert_eq!(back.get_pixel(x, 0), Some(x * 80));
        }
    }

    #[test]
    fn test_truncated_raster() {
        let data = b"P6\n2 2\n255\n\x00\x01\x02";
        assert!(matches!(
            read_pnm(Cursor::new(&data[..])),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_header_larger_than_raster() {
        let data = b"P5\n4294967295 4294967295\n255\n\0";
        assert!(matches!(
            read_pnm(Cursor::new(&data[..])),
            Err(IoError::InvalidData(_))
        ));

        // 16-bit samples need two bytes each
        let data = b"P5\n2 1\n65535\n\xff\xff\x00";
        assert!(matches!(
            read_pnm(Cursor::new(&data[..])),
            Err(IoError::InvalidData(_))
        ));

        let data = b"P3\n100000 100000\n255\n1 2 3\n";
        assert!(matches!(
            read_pnm(Cursor::new(&data[..])),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_sample_above_maxval() {
        let data = b"P2\n1 1\n100\n101\n";
        assert!(read_pnm(Cursor::new(&data[..])).is_err());
    }

    #[test]
    fn test_unsupported_magic() {
        assert!(matches!(
            read_pnm(Cursor::new(&b"P4\n1 1\n\x00"[..])),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
