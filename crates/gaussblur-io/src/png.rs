//! PNG image format support
//!
//! Palette, low-bit-depth and 16-bit images are normalized to 8 bits per
//! sample by the decoder. Alpha channels are dropped.

use crate::{IoError, IoResult};
use gaussblur_core::{ImageFormat, Pix, PixMut, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
///
/// Returns 8 bpp for grayscale sources and 32 bpp RGB otherwise.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let color_type = output_info.color_type;
    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unexpected PNG output depth: {:?}",
            output_info.bit_depth
        )));
    }

    let depth = match color_type {
        ColorType::Grayscale => PixelDepth::Bit8,
        _ => PixelDepth::Bit32,
    };
    let mut pix_mut = PixMut::new(width, height, depth)?;
    pix_mut.set_informat(ImageFormat::Png);

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let samples = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "indexed PNG was not expanded".to_string(),
            ));
        }
    };

    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..][..width as usize * samples];
        for (x, px) in (0..width).zip(row.chunks_exact(samples)) {
            let value = match color_type {
                ColorType::Grayscale => px[0] as u32,
                ColorType::GrayscaleAlpha => color::compose_rgb(px[0], px[0], px[0]),
                _ => color::compose_rgb(px[0], px[1], px[2]),
            };
            pix_mut.set_pixel_unchecked(x, y, value);
        }
    }

    Ok(pix_mut.into())
}

/// Write a PNG image
///
/// 8 bpp images are written as 8-bit grayscale, 32 bpp as 8-bit RGB.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, samples) = match pix.depth() {
        PixelDepth::Bit8 => (ColorType::Grayscale, 1usize),
        PixelDepth::Bit32 => (ColorType::Rgb, 3usize),
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let bytes_per_row = width as usize * samples;
    let mut data = vec![0u8; bytes_per_row * height as usize];

    for (y, row) in (0..height).zip(data.chunks_exact_mut(bytes_per_row)) {
        for (x, out) in (0..width).zip(row.chunks_exact_mut(samples)) {
            let pixel = pix.get_pixel_unchecked(x, y);
            match pix.depth() {
                PixelDepth::Bit8 => out[0] = pixel as u8,
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(pixel);
                    out.copy_from_slice(&[r, g, b]);
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
