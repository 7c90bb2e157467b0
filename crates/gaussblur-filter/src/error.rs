//! Error types for gaussblur-filter

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] gaussblur_core::Error),

    /// Kernel contents are unusable (e.g. weights summing to zero)
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth {
        /// Expected depth description
        expected: &'static str,
        /// Actual depth in bits
        actual: u32,
    },

    /// Invalid size, sigma or other parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
