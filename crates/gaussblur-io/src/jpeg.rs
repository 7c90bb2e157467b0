//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Grayscale sources decode to 8 bpp, everything else to
//! 32 bpp RGB.

use crate::{IoError, IoResult};
use gaussblur_core::{ImageFormat, Pix, PixMut, PixelDepth, color};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use std::io::{Read, Write};

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// A `Pix` at 8 bpp (grayscale) or 32 bpp (RGB / CMYK converted to RGB).
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    let (depth, samples) = match info.pixel_format {
        PixelFormat::L8 => (PixelDepth::Bit8, 1usize),
        PixelFormat::L16 => (PixelDepth::Bit8, 2),
        PixelFormat::RGB24 => (PixelDepth::Bit32, 3),
        PixelFormat::CMYK32 => (PixelDepth::Bit32, 4),
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    let expected = width as usize * height as usize * samples;
    if data.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG data too short: {} < {}",
            data.len(),
            expected
        )));
    }

    let mut pix_mut = PixMut::new(width, height, depth)?;
    pix_mut.set_informat(ImageFormat::Jpeg);

    let row_bytes = width as usize * samples;
    for (y, row) in (0..height).zip(data.chunks_exact(row_bytes)) {
        for (x, px) in (0..width).zip(row.chunks_exact(samples)) {
            let value = match samples {
                // 16-bit samples are big-endian; keep the high byte
                1 | 2 => px[0] as u32,
                3 => color::compose_rgb(px[0], px[1], px[2]),
                _ => cmyk_to_rgb(px[0], px[1], px[2], px[3]),
            };
            pix_mut.set_pixel_unchecked(x, y, value);
        }
    }

    Ok(pix_mut.into())
}

fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> u32 {
    let inv = |v: u8| ((255 - v as u32) * (255 - k as u32) / 255) as u8;
    color::compose_rgb(inv(c), inv(m), inv(y))
}

/// Write a `Pix` as baseline JPEG.
///
/// # Arguments
/// * `pix`     - The image to encode (8 bpp gray or 32 bpp RGB)
/// * `writer`  - Destination writer
/// * `quality` - Quality in `1..=100`
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    if !(1..=100).contains(&quality) {
        return Err(IoError::EncodeError(format!(
            "JPEG quality must be in 1..=100, got {}",
            quality
        )));
    }

    let width = u16::try_from(pix.width())
        .map_err(|_| IoError::EncodeError(format!("JPEG width too large: {}", pix.width())))?;
    let height = u16::try_from(pix.height())
        .map_err(|_| IoError::EncodeError(format!("JPEG height too large: {}", pix.height())))?;

    let (color_type, samples) = match pix.depth() {
        PixelDepth::Bit8 => (ColorType::Luma, 1usize),
        PixelDepth::Bit32 => (ColorType::Rgb, 3usize),
    };

    let mut data = Vec::with_capacity(pix.width() as usize * pix.height() as usize * samples);
    for y in 0..pix.height() {
        for x in 0..pix.width() {
            let pixel = pix.get_pixel_unchecked(x, y);
            match pix.depth() {
                PixelDepth::Bit8 => data.push(pixel as u8),
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(pixel);
                    data.extend_from_slice(&[r, g, b]);
                }
            }
        }
    }

    let encoder = Encoder::new(writer, quality);
    encoder
        .encode(&data, width, height, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_roundtrip_flat_rgb() {
        let mut pix_mut = PixMut::new(16, 16, PixelDepth::Bit32).unwrap();
        pix_mut.set_all_arbitrary(color::compose_rgb(200, 100, 50));
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_jpeg(&pix, &mut buffer, 95).unwrap();
        let back = read_jpeg(Cursor::new(buffer)).unwrap();

        assert_eq!(back.width(), 16);
        assert_eq!(back.height(), 16);
        assert_eq!(back.depth(), PixelDepth::Bit32);
        assert_eq!(back.informat(), ImageFormat::Jpeg);

        // Lossy: a flat field should come back within a few levels
        let (r, g, b) = back.get_rgb(8, 8).unwrap();
        assert!((r as i32 - 200).abs() <= 4, "r = {}", r);
        assert!((g as i32 - 100).abs() <= 4, "g = {}", g);
        assert!((b as i32 - 50).abs() <= 4, "b = {}", b);
    }

    #[test]
    fn test_jpeg_roundtrip_gray() {
        let mut pix_mut = PixMut::new(8, 8, PixelDepth::Bit8).unwrap();
        pix_mut.set_all_arbitrary(90);
        let pix: Pix = pix_mut.into();

        let mut buffer = Vec::new();
        write_jpeg(&pix, &mut buffer, 90).unwrap();
        let back = read_jpeg(Cursor::new(buffer)).unwrap();
        assert_eq!(back.depth(), PixelDepth::Bit8);
        let v = back.get_pixel(3, 3).unwrap() as i32;
        assert!((v - 90).abs() <= 2, "v = {}", v);
    }

    #[test]
    fn test_jpeg_invalid_quality() {
        let pix = Pix::new(2, 2, PixelDepth::Bit32).unwrap();
        assert!(write_jpeg(&pix, Vec::new(), 0).is_err());
        assert!(write_jpeg(&pix, Vec::new(), 101).is_err());
    }

    #[test]
    fn test_jpeg_garbage() {
        let data = [0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02];
        assert!(read_jpeg(Cursor::new(&data[..])).is_err());
    }

    #[test]
    fn test_cmyk_to_rgb() {
        assert_eq!(cmyk_to_rgb(0, 0, 0, 0), color::compose_rgb(255, 255, 255));
        assert_eq!(cmyk_to_rgb(255, 0, 0, 0), color::compose_rgb(0, 255, 255));
        assert_eq!(cmyk_to_rgb(0, 0, 0, 255), color::compose_rgb(0, 0, 0));
    }
}
