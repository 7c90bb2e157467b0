//! gaussblur-io - Image decoding and encoding
//!
//! Reads images into [`Pix`] and writes them back out. The input format is
//! detected from the file's magic bytes; the output format is chosen by the
//! caller or inferred from the output path's extension.
//!
//! Supported formats (each behind a Cargo feature, all on by default):
//!
//! - PNG (`png-format`, via the `png` crate)
//! - JPEG (`jpeg`, via `jpeg-decoder` / `jpeg-encoder`)
//! - BMP (`bmp`)
//! - PNM: PGM / PPM, ASCII and binary (`pnm`)

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::detect_format_from_bytes;
pub use gaussblur_core::ImageFormat;

use gaussblur_core::Pix;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Default JPEG quality, matching common codec defaults.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Encoder settings for [`write_image_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// JPEG quality in `1..=100`; ignored by lossless formats.
    pub jpeg_quality: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Read an image from a file path.
///
/// Returns the image at its native depth: 8 bpp for single-channel
/// grayscale sources, 32 bpp RGB for everything else.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    read_image_mem(&data)
}

/// Read an image from a file path, always returning 32 bpp RGB.
///
/// Grayscale sources are expanded to three equal channels and alpha is
/// dropped, so callers always see three 8-bit color channels.
pub fn read_image_color<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let pix = read_image(path)?;
    Ok(pix.convert_to_32()?)
}

/// Decode an image held in memory.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    log::debug!("detected input format {:?}", format);
    let cursor = Cursor::new(data);

    let pix = match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(cursor)?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(cursor)?,
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(cursor)?,
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(cursor)?,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} support is not enabled",
                other
            )));
        }
    };

    log::debug!(
        "decoded {}x{} image at {} bpp",
        pix.width(),
        pix.height(),
        pix.depth().bits()
    );
    Ok(pix)
}

/// Write an image to a file path in the given format.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    write_image_with(pix, path, format, &WriteOptions::default())
}

/// Write an image, choosing the format from the path's extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] if the extension is missing or
/// not recognized. Nothing is written in that case.
pub fn write_image_auto<P: AsRef<Path>>(pix: &Pix, path: P, options: &WriteOptions) -> IoResult<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path);
    if format == ImageFormat::Unknown {
        return Err(IoError::UnsupportedFormat(format!(
            "cannot infer output format from '{}'",
            path.display()
        )));
    }
    write_image_with(pix, path, format, options)
}

/// Write an image to a file path with explicit encoder settings.
pub fn write_image_with<P: AsRef<Path>>(
    pix: &Pix,
    path: P,
    format: ImageFormat,
    options: &WriteOptions,
) -> IoResult<()> {
    // Encode first so an unsupported format never leaves an empty file.
    let data = write_image_mem(pix, format, options)?;
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&data)?;
    writer.flush()?;
    log::debug!(
        "wrote {} bytes as {:?} to {}",
        data.len(),
        format,
        path.display()
    );
    Ok(())
}

/// Encode an image into memory.
pub fn write_image_mem(pix: &Pix, format: ImageFormat, options: &WriteOptions) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, &mut buffer)?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(pix, &mut buffer, options.jpeg_quality)?,
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::write_bmp(pix, &mut buffer)?,
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(pix, &mut buffer)?,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {:?}",
                other
            )));
        }
    }
    #[cfg(not(feature = "jpeg"))]
    let _ = options;
    Ok(buffer)
}
