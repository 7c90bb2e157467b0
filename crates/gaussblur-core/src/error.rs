//! Error types for gaussblur-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// gaussblur core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Unsupported pixel depth for this operation
    #[error("unsupported pixel depth: {0} bpp")]
    UnsupportedDepth(u32),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
