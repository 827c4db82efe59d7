//! Writing the stitched image to disk.

use std::path::Path;

use panstitch_pipeline::RgbImage;

use crate::error::RunError;

/// Encode `image` in the format implied by `path`'s extension and write it.
///
/// Parent directories are not created.
///
/// # Errors
///
/// Returns [`RunError::OutputWrite`] if the extension names no supported
/// format or the file cannot be written.
pub fn save_image(path: &Path, image: &RgbImage) -> Result<(), RunError> {
    image.save(path).map_err(|source| RunError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "Saved {}x{} stitched image to {}",
        image.width(),
        image.height(),
        path.display(),
    );
    Ok(())
}
