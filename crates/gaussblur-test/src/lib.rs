//! gaussblur-test - Regression test framework
//!
//! Drives the `*_reg.rs` integration tests of the workspace crates in one
//! of three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! # Usage
//!
//! ```ignore
//! use gaussblur_test::{RegParams, load_test_image};
//!
//! let mut rp = RegParams::new("convolve");
//! let pix = load_test_image("gradient.ppm")?;
//! rp.compare_values(16.0, pix.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Load a test image from the test data directory
///
/// # Arguments
///
/// * `name` - Image filename (e.g., "gradient.ppm")
pub fn load_test_image(name: &str) -> TestResult<gaussblur_core::Pix> {
    let path = test_data_path(name);
    gaussblur_io::read_image(&path).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // gaussblur-test is at crates/gaussblur-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a test data file
pub fn test_data_path(name: &str) -> String {
    format!("{}/tests/data/images/{}", workspace_root(), name)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
