//! BMP image format support
//!
//! Reads and writes uncompressed Windows Bitmap (BMP) files.
//! Palette images (1, 4, 8 bpp) are expanded to 32 bpp RGB on read
//! unless the palette is the identity gray ramp, in which case they stay
//! at 8 bpp.

use crate::{IoError, IoResult};
use gaussblur_core::{ImageFormat, Pix, PixMut, PixelDepth, color};
use std::io::{Read, Write};

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Largest info header defined (BITMAPV5HEADER)
const BMP_MAX_HEADER_SIZE: u32 = 124;

fn le_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn le_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le_i32(b: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

/// Read a BMP image
///
/// Header sizes, the palette and the pixel array are checked against the
/// input length before anything is allocated.
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(IoError::Io)?;

    let file_header = data
        .get(..BMP_FILE_HEADER_SIZE)
        .ok_or_else(|| truncated("file header"))?;
    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }

    let pixel_offset = le_u32(file_header, 10) as usize;

    let info_header = data
        .get(BMP_FILE_HEADER_SIZE..BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize)
        .ok_or_else(|| truncated("info header"))?;

    let header_size = le_u32(info_header, 0);
    if !(BMP_INFO_HEADER_SIZE..=BMP_MAX_HEADER_SIZE).contains(&header_size) {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_i32(info_header, 4);
    let height = le_i32(info_header, 8);

    let planes = le_u16(info_header, 12);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }

    let bits_per_pixel = le_u16(info_header, 14);
    let compression = le_u32(info_header, 16);

    // Only BI_RGB and BI_BITFIELDS with the default masks
    if compression != 0 && compression != 3 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }

    let width = width.unsigned_abs();
    let top_down = height < 0;
    let height = height.unsigned_abs();

    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    // Palette entries are stored as B, G, R, reserved
    let palette_start = BMP_FILE_HEADER_SIZE + header_size as usize;
    let palette: Vec<u32> = if bits_per_pixel <= 8 {
        let colors_used = le_u32(info_header, 32) as usize;
        let num_colors = if colors_used == 0 {
            1usize << bits_per_pixel
        } else {
            colors_used.min(1 << bits_per_pixel)
        };
        data.get(palette_start..palette_start + num_colors * 4)
            .ok_or_else(|| truncated("palette"))?
            .chunks_exact(4)
            .map(|q| color::compose_rgb(q[2], q[1], q[0]))
            .collect()
    } else {
        Vec::new()
    };

    let consumed = palette_start + palette.len() * 4;
    let pixels = data.get(pixel_offset.max(consumed)..).unwrap_or_default();

    // BMP rows are 4-byte aligned
    let row_stride = (u64::from(width) * u64::from(bits_per_pixel)).div_ceil(32) * 4;
    let needed = row_stride
        .checked_mul(u64::from(height))
        .ok_or_else(|| truncated("pixel data"))?;
    if needed > pixels.len() as u64 {
        return Err(truncated("pixel data"));
    }

    let gray_ramp = bits_per_pixel == 8
        && palette.len() == 256
        && palette
            .iter()
            .enumerate()
            .all(|(i, &p)| p == color::compose_rgb(i as u8, i as u8, i as u8));

    let depth = if gray_ramp {
        PixelDepth::Bit8
    } else {
        PixelDepth::Bit32
    };
    let mut pix_mut = PixMut::new(width, height, depth)?;
    pix_mut.set_informat(ImageFormat::Bmp);

    let lookup = |index: u8| -> IoResult<u32> {
        palette.get(index as usize).copied().ok_or_else(|| {
            IoError::InvalidData(format!("BMP palette index {} out of range", index))
        })
    };

    // Nonzero width and height were checked above, and the rows fit `pixels`
    let rows = pixels.chunks_exact(row_stride as usize).take(height as usize);
    for (row, row_buffer) in (0..height).zip(rows) {
        let y = if top_down { row } else { height - 1 - row };

        for x in 0..width {
            let xs = x as usize;
            let value = match bits_per_pixel {
                1 => lookup((row_buffer[xs / 8] >> (7 - (xs % 8))) & 1)?,
                4 => {
                    let byte = row_buffer[xs / 2];
                    lookup(if xs % 2 == 0 { byte >> 4 } else { byte & 0xF })?
                }
                8 if gray_ramp => row_buffer[xs] as u32,
                8 => lookup(row_buffer[xs])?,
                24 => {
                    let idx = xs * 3;
                    color::compose_rgb(row_buffer[idx + 2], row_buffer[idx + 1], row_buffer[idx])
                }
                _ => {
                    let idx = xs * 4;
                    color::compose_rgb(row_buffer[idx + 2], row_buffer[idx + 1], row_buffer[idx])
                }
            };
            pix_mut.set_pixel_unchecked(x, y, value);
        }
    }

    Ok(pix_mut.into())
}

fn truncated(what: &str) -> IoError {
    IoError::InvalidData(format!("BMP: truncated {}", what))
}

/// Write a BMP image
///
/// 8 bpp images get a gray-ramp palette; 32 bpp images are written as
/// 24-bit BGR.
pub fn write_bmp<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();
    let depth = pix.depth();

    let bits_per_pixel: u16 = match depth {
        PixelDepth::Bit8 => 8,
        PixelDepth::Bit32 => 24,
    };

    let row_stride = (width as usize * bits_per_pixel as usize).div_ceil(32) * 4;
    let pixel_data_size = row_stride * height as usize;
    let colormap_size = if depth == PixelDepth::Bit8 { 256 * 4 } else { 0 };

    let pixel_offset = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize + colormap_size;
    let file_size = u32::try_from(pixel_offset + pixel_data_size)
        .map_err(|_| IoError::EncodeError("image too large for BMP".to_string()))?;

    let mut header = Vec::with_capacity(pixel_offset);
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&file_size.to_le_bytes());
    header.extend_from_slice(&[0u8; 4]); // Reserved
    header.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

    header.extend_from_slice(&BMP_INFO_HEADER_SIZE.to_le_bytes());
    header.extend_from_slice(&(width as i32).to_le_bytes());
    header.extend_from_slice(&(height as i32).to_le_bytes()); // Bottom-up
    header.extend_from_slice(&1u16.to_le_bytes()); // Planes
    header.extend_from_slice(&bits_per_pixel.to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes()); // Compression
    header.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    header.extend_from_slice(&0i32.to_le_bytes()); // X pixels per meter
    header.extend_from_slice(&0i32.to_le_bytes()); // Y pixels per meter
    header.extend_from_slice(&0u32.to_le_bytes()); // Colors used
    header.extend_from_slice(&0u32.to_le_bytes()); // Important colors

    if depth == PixelDepth::Bit8 {
        for i in 0..=255u8 {
            header.extend_from_slice(&[i, i, i, 0]);
        }
    }
    writer.write_all(&header).map_err(IoError::Io)?;

    let mut row_buffer = vec![0u8; row_stride];
    for row in 0..height {
        let y = height - 1 - row;
        for x in 0..width {
            let pixel = pix.get_pixel_unchecked(x, y);
            match depth {
                PixelDepth::Bit8 => row_buffer[x as usize] = pixel as u8,
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(pixel);
                    let idx = (x as usize) * 3;
                    row_buffer[idx..idx + 3].copy_from_slice(&[b, g, r]);
                }
            }
        }
        writer.write_all(&row_buffer).map_err(IoError::Io)?;
    }

    Ok(())
}
