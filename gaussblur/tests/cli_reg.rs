//! Command-line regression test
//!
//! Runs the `gaussblur` binary on real files and checks exit status,
//! printed messages and the written image.

use gaussblur::{ImageFormat, Pix, PixMut, PixelDepth, color};
use gaussblur_test::{RegParams, load_test_image};
use std::path::Path;
use std::process::{Command, Output};

fn gaussblur(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gaussblur"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn gaussblur")
}

fn red_image() -> Pix {
    let mut pix = PixMut::new(10, 10, PixelDepth::Bit32).expect("red image");
    pix.set_all_arbitrary(color::compose_rgb(255, 0, 0));
    pix.into()
}

#[test]
fn cli_reg() {
    let mut rp = RegParams::new("cli");
    let dir = tempfile::tempdir().expect("tempdir");

    // --- Test 1: Explicit paths, PNG in and out ---
    let input = dir.path().join("red.png");
    gaussblur::io::write_image(&red_image(), &input, ImageFormat::Png).expect("write red.png");
    let out = gaussblur(dir.path(), &["red.png", "blurred.png"]);
    rp.compare_values(1.0, if out.status.success() { 1.0 } else { 0.0 }, 0.0);
    let stdout = String::from_utf8_lossy(&out.stdout);
    rp.compare_values(
        1.0,
        if stdout.contains("Successfully applied 8x8 Gaussian filter to red.png")
            && stdout.contains("Output saved to blurred.png")
        {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    let blurred = gaussblur::io::read_image(dir.path().join("blurred.png")).expect("read output");
    rp.compare_pix(&red_image(), &blurred);

    // --- Test 2: Default paths input.jpg -> output.jpg ---
    let gradient = load_test_image("gradient.ppm").expect("load gradient.ppm");
    gaussblur::io::write_image(&gradient, dir.path().join("input.jpg"), ImageFormat::Jpeg)
        .expect("write input.jpg");
    let out = gaussblur(dir.path(), &[]);
    rp.compare_values(1.0, if out.status.success() { 1.0 } else { 0.0 }, 0.0);
    let written = gaussblur::io::read_image(dir.path().join("output.jpg")).expect("read output.jpg");
    rp.compare_values(gradient.width() as f64, written.width() as f64, 0.0);
    rp.compare_values(gradient.height() as f64, written.height() as f64, 0.0);
    rp.compare_values(
        ImageFormat::Jpeg as i32 as f64,
        written.informat() as i32 as f64,
        0.0,
    );

    // --- Test 3: Options and gray input ---
    let gray = load_test_image("checker.pgm").expect("load checker.pgm");
    gaussblur::io::write_image(&gray, dir.path().join("checker.pgm"), ImageFormat::Pnm)
        .expect("write checker.pgm");
    let out = gaussblur(
        dir.path(),
        &[
            "checker.pgm",
            "checker_blur.bmp",
            "--width",
            "3",
            "--height",
            "5",
            "--sigma-x",
            "0.8",
            "--border",
            "reflect101",
        ],
    );
    rp.compare_values(1.0, if out.status.success() { 1.0 } else { 0.0 }, 0.0);
    let stdout = String::from_utf8_lossy(&out.stdout);
    rp.compare_values(
        1.0,
        if stdout.contains("Successfully applied 3x5 Gaussian filter") {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    let blurred = gaussblur::io::read_image(dir.path().join("checker_blur.bmp"))
        .expect("read checker_blur.bmp");
    // Gray input is decoded as color, so the output is RGB with equal channels
    rp.compare_values(32.0, blurred.depth().bits() as f64, 0.0);
    let (r, g, b) = blurred.get_rgb(3, 3).unwrap_or((0, 1, 2));
    rp.compare_values(r as f64, g as f64, 0.0);
    rp.compare_values(g as f64, b as f64, 0.0);

    assert!(rp.cleanup(), "cli regression test failed");
}

#[test]
fn cli_errors_reg() {
    let mut rp = RegParams::new("cli_errors");
    let dir = tempfile::tempdir().expect("tempdir");

    // --- Missing input ---
    let out = gaussblur(dir.path(), &["missing.png", "out.png"]);
    rp.compare_values(1.0, out.status.code().unwrap_or(-1) as f64, 0.0);
    let stderr = String::from_utf8_lossy(&out.stderr);
    rp.compare_values(
        1.0,
        if stderr.contains("Error: Could not read the image: missing.png") {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    rp.compare_values(0.0, if dir.path().join("out.png").exists() { 1.0 } else { 0.0 }, 0.0);

    // --- Header promising more pixels than the file holds ---
    std::fs::write(dir.path().join("huge.pgm"), b"P5\n4294967295 4294967295\n255\n\0")
        .expect("write huge.pgm");
    let out = gaussblur(dir.path(), &["huge.pgm", "out.png"]);
    rp.compare_values(1.0, out.status.code().unwrap_or(-1) as f64, 0.0);
    let stderr = String::from_utf8_lossy(&out.stderr);
    rp.compare_values(
        1.0,
        if stderr.contains("Error: Could not read the image: huge.pgm") {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    // --- Unwritable output ---
    gaussblur::io::write_image(&red_image(), dir.path().join("red.png"), ImageFormat::Png)
        .expect("write red.png");
    let out = gaussblur(dir.path(), &["red.png", "out.unknown"]);
    rp.compare_values(1.0, out.status.code().unwrap_or(-1) as f64, 0.0);
    let stderr = String::from_utf8_lossy(&out.stderr);
    rp.compare_values(
        1.0,
        if stderr.contains("Error: Could not write the output image: out.unknown") {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    // --- Invalid sigma ---
    let out = gaussblur(dir.path(), &["red.png", "out.png", "--sigma", "0"]);
    rp.compare_values(1.0, out.status.code().unwrap_or(-1) as f64, 0.0);
    let stderr = String::from_utf8_lossy(&out.stderr);
    rp.compare_values(
        1.0,
        if stderr.contains("Error: invalid parameter:") {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    assert!(rp.cleanup(), "cli errors regression test failed");
}
