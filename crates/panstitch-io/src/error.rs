//! Errors for a full stitching run.

use std::path::PathBuf;

use panstitch_pipeline::{ConfigError, StitchError};

/// Errors that abort a stitching run.
///
/// Every variant is fatal; nothing is retried or skipped.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The configuration failed re-validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input directory could not be listed.
    #[error("failed to list images in {}: {source}", path.display())]
    DirectoryRead {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An input file could not be decoded, or decoded to an empty image.
    #[error("error reading image {}: {reason}", path.display())]
    ImageRead {
        /// File that failed.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Splitting, counting, or the stitcher itself failed.
    #[error(transparent)]
    Stitch(#[from] StitchError),

    /// The result could not be shown.
    #[error("failed to display stitched image: {0}")]
    Display(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The result could not be encoded or written.
    #[error("error saving stitched image to {}: {source}", path.display())]
    OutputWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying encode or I/O error.
        source: image::ImageError,
    },
}
