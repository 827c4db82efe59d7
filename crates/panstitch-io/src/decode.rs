//! Decoding input files into RGB images.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::ImageReader;
use panstitch_pipeline::RgbImage;

use crate::error::RunError;

/// Decode one image file to 8-bit RGB.
///
/// The format is sniffed from the file contents, so a mislabelled
/// extension still decodes.
///
/// # Errors
///
/// Returns [`RunError::ImageRead`] if the file cannot be opened or
/// decoded, or decodes to an image with a zero-sized axis.
pub fn load_image(path: &Path) -> Result<RgbImage, RunError> {
    let start = Instant::now();
    let read_error = |reason: String| RunError::ImageRead {
        path: path.to_path_buf(),
        reason,
    };

    let decoded = ImageReader::open(path)
        .map_err(|e| read_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| read_error(e.to_string()))?
        .decode()
        .map_err(|e| read_error(e.to_string()))?;

    let image = decoded.to_rgb8();
    if image.width() == 0 || image.height() == 0 {
        return Err(read_error("decoded image is empty".to_owned()));
    }

    log::debug!(
        "Loaded {} in {:?} - Size: {}x{}",
        path.display(),
        start.elapsed(),
        image.width(),
        image.height(),
    );
    Ok(image)
}

/// Decode every path in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first [`RunError::ImageRead`] encountered; no partial set
/// is returned.
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<RgbImage>, RunError> {
    paths.iter().map(|path| load_image(path)).collect()
}
