//! I/O formats regression test
//!
//! Encodes the test images in every supported format, decodes them again
//! and checks the result. Lossless formats must reproduce the pixels
//! exactly; JPEG must stay close.

use gaussblur_core::{Pix, PixMut, PixelDepth, color};
use gaussblur_io::{ImageFormat, WriteOptions, read_image_mem, write_image_mem};
use gaussblur_test::{RegParams, load_test_image};

#[test]
fn ioformats_reg() {
    let mut rp = RegParams::new("ioformats");

    let rgb = load_test_image("gradient.ppm").expect("load gradient.ppm");
    let gray = load_test_image("checker.pgm").expect("load checker.pgm");
    rp.compare_values(32.0, rgb.depth().bits() as f64, 0.0);
    rp.compare_values(8.0, gray.depth().bits() as f64, 0.0);

    let opts = WriteOptions::default();
    for pix in [&rgb, &gray] {
        for format in [ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Pnm] {
            let data = write_image_mem(pix, format, &opts).expect("encode");
            let back = read_image_mem(&data).expect("decode");
            rp.compare_values(format_code(format), format_code(back.informat()), 0.0);
            rp.compare_pix(pix, &back);
            eprintln!(
                "  {:?} {} bpp: {} bytes",
                format,
                pix.depth().bits(),
                data.len()
            );
        }
    }

    // JPEG is lossy: compare the mean absolute error per channel on a
    // smooth image
    let smooth = smooth_image(32, 24);
    let data = write_image_mem(&smooth, ImageFormat::Jpeg, &opts).expect("encode jpeg");
    let back = read_image_mem(&data).expect("decode jpeg");
    rp.compare_values(smooth.width() as f64, back.width() as f64, 0.0);
    rp.compare_values(smooth.height() as f64, back.height() as f64, 0.0);
    let err = mean_abs_error(&smooth, &back);
    eprintln!("  Jpeg q={}: mean abs error {:.2}", opts.jpeg_quality, err);
    rp.compare_values(0.0, err, 6.0);

    rp.write_pix_and_check(&rgb, ImageFormat::Png)
        .expect("write gradient");

    assert!(rp.cleanup(), "ioformats regression test failed");
}

fn smooth_image(width: u32, height: u32) -> Pix {
    let mut pix = PixMut::new(width, height, PixelDepth::Bit32).expect("smooth image");
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            pix.set_pixel_unchecked(x, y, color::compose_rgb(r, g, 128));
        }
    }
    pix.into()
}

fn format_code(format: ImageFormat) -> f64 {
    match format {
        ImageFormat::Unknown => 0.0,
        ImageFormat::Bmp => 1.0,
        ImageFormat::Jpeg => 2.0,
        ImageFormat::Png => 3.0,
        ImageFormat::Pnm => 4.0,
    }
}

fn mean_abs_error(a: &Pix, b: &Pix) -> f64 {
    assert_eq!(a.depth(), PixelDepth::Bit32);
    assert_eq!(b.depth(), PixelDepth::Bit32);
    let mut total = 0.0;
    for y in 0..a.height() {
        for x in 0..a.width() {
            let pa = a.get_pixel_unchecked(x, y);
            let pb = b.get_pixel_unchecked(x, y);
            for c in [color::RED, color::GREEN, color::BLUE] {
                total += (color::channel(pa, c) as f64 - color::channel(pb, c) as f64).abs();
            }
        }
    }
    total / (a.width() * a.height() * 3) as f64
}
