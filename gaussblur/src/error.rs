//! Application-level errors

use gaussblur_filter::FilterError;
use gaussblur_io::IoError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a blur job
///
/// The `Display` text is the user-facing message printed after `Error: `.
#[derive(Debug, Error)]
pub enum BlurError {
    /// The input could not be opened or decoded
    #[error("Could not read the image: {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// The output could not be encoded or written
    #[error("Could not write the output image: {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Kernel parameters were rejected
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// JPEG quality outside `1..=100`
    #[error("invalid parameter: JPEG quality must be in 1..=100, got {0}")]
    InvalidQuality(u8),
}
