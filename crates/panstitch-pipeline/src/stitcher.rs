//! Seams to the external stitching library and display surface.
//!
//! Feature matching, camera estimation, seam finding and blending all
//! happen behind [`Stitcher`]. This crate only prepares the input set
//! and interprets the status the stitcher reports.

use crate::types::RgbImage;

/// What a stitcher backend hands back: its raw status code and, on
/// success, the stitched image.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStitch {
    /// Library status code (see [`StitchStatus::from_code`](crate::StitchStatus::from_code)).
    pub code: i32,
    /// The stitched image, if any.
    pub image: Option<RgbImage>,
}

/// A configured instance of the external stitcher.
///
/// Instances are created for one [`StitchMode`](crate::StitchMode) by a
/// factory closure passed to [`stitch_images`](crate::stitch_images).
pub trait Stitcher {
    /// Error raised by the backend itself, as opposed to a stitch status.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Set the minimum pairwise match confidence.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the setting is rejected.
    fn set_confidence_threshold(&mut self, threshold: f64) -> Result<(), Self::Error>;

    /// Stitch `images`, in order, into one image.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the call itself fails. A stitch that
    /// runs but does not converge is reported through [`RawStitch::code`].
    fn stitch(&mut self, images: &[RgbImage]) -> Result<RawStitch, Self::Error>;
}

/// A display surface for inspecting the stitched image.
pub trait Viewer {
    /// Error raised by the display backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Show `image` in a window titled `title` and block until the user
    /// dismisses it. There is no timeout.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the image cannot be shown.
    fn show(&mut self, title: &str, image: &RgbImage) -> Result<(), Self::Error>;
}
