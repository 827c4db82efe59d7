//! panstitch-pipeline: stitching configuration and pre-processing (sans-IO).
//!
//! Prepares an in-memory image set for the external stitcher and turns
//! its status code into a typed result:
//! optional split into thirds -> image count check -> stitch ->
//! status lookup.
//!
//! This crate has **no filesystem dependencies**. Directory discovery,
//! decoding and writing live in `panstitch-io`; the concrete stitcher
//! backend lives in the `panstitch` binary.

pub mod split;
pub mod status;
pub mod stitcher;
pub mod types;

pub use status::{StitchStatus, UNKNOWN_MESSAGE};
pub use stitcher::{RawStitch, Stitcher, Viewer};
pub use types::{
    ConfigError, ConfigParams, Dimensions, RgbImage, StitchConfig, StitchError, StitchMode,
    StitchResult,
};

/// Fewest images the stitcher will be asked to combine.
pub const MIN_IMAGES: usize = 2;

/// A successful stitch together with how many pieces went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stitched {
    /// The stitched image.
    pub image: RgbImage,
    /// Number of images handed to the stitcher, after any splitting.
    pub pieces: usize,
}

impl StitchResult {
    /// Map a backend's raw output through the status table.
    ///
    /// Any image returned alongside a non-OK status is discarded.
    #[must_use]
    pub fn from_raw(raw: RawStitch) -> Self {
        let status = StitchStatus::from_code(raw.code);
        Self {
            status,
            image: raw.image.filter(|_| status.is_ok()),
        }
    }

    /// The stitched image, or the error describing why there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::StitchingFailed`] for any non-OK status.
    /// Returns [`StitchError::EmptyPanorama`] if an OK status came with no
    /// image or a zero-sized one.
    pub fn into_image(self) -> Result<RgbImage, StitchError> {
        if !self.status.is_ok() {
            return Err(StitchError::StitchingFailed {
                status: self.status,
                message: self.status.message(),
            });
        }
        match self.image {
            Some(image) if !Dimensions::of(&image).is_empty() => Ok(image),
            _ => Err(StitchError::EmptyPanorama),
        }
    }
}

/// Stitch an in-memory image set.
///
/// # Steps
///
/// 1. If `config.split_into_thirds`, replace each image by its three
///    vertical slices
/// 2. Require at least [`MIN_IMAGES`] images
/// 3. Create the stitcher for `config.method` and set its confidence
/// 4. Stitch and resolve the status through the status table
///
/// The stitcher is only created once the image count has been checked.
///
/// # Errors
///
/// Returns [`StitchError::InsufficientImages`] if fewer than two images
/// remain after splitting.
/// Returns [`StitchError::Backend`] if the factory, the confidence setter,
/// or the stitch call fails.
/// Returns [`StitchError::StitchingFailed`] if the stitcher reports a
/// non-OK status, and [`StitchError::EmptyPanorama`] if it reports OK
/// without an image.
pub fn stitch_images<S, F>(
    images: Vec<RgbImage>,
    config: &StitchConfig,
    make_stitcher: F,
) -> Result<Stitched, StitchError>
where
    S: Stitcher,
    F: FnOnce(StitchMode) -> Result<S, S::Error>,
{
    // 1. Optional split.
    let images = if config.split_into_thirds {
        let before = images.len();
        let split = split::split_all(images);
        log::info!("Split {before} images into {} pieces", split.len());
        split
    } else {
        images
    };

    // 2. Enough images to stitch?
    if images.len() < MIN_IMAGES {
        return Err(StitchError::InsufficientImages {
            count: images.len(),
        });
    }

    // 3. Configure the stitcher.
    let mut stitcher = make_stitcher(config.method).map_err(StitchError::backend)?;
    stitcher
        .set_confidence_threshold(config.confidence_threshold)
        .map_err(StitchError::backend)?;

    // 4. Stitch and map the status.
    log::info!(
        "Stitching {} images (method={}, confidence={})",
        images.len(),
        config.method,
        config.confidence_threshold,
    );
    let raw = stitcher.stitch(&images).map_err(StitchError::backend)?;
    let result = StitchResult::from_raw(raw);
    log::debug!("Stitcher returned status {}", result.status);

    let image = result.into_image()?;
    Ok(Stitched {
        image,
        pieces: images.len(),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
mod tests {
    use std::convert::Infallible;

    use image::Rgb;

    use super::*;

    /// Records what it was asked to do and returns a canned code.
    struct Recording {
        mode: StitchMode,
        code: i32,
        confidence: Option<f64>,
    }

    impl Recording {
        fn factory(code: i32) -> impl FnOnce(StitchMode) -> Result<Self, Infallible> {
            move |mode| {
                Ok(Self {
                    mode,
                    code,
                    confidence: None,
                })
            }
        }
    }

    impl Stitcher for Recording {
        type Error = Infallible;

        fn set_confidence_threshold(&mut self, threshold: f64) -> Result<(), Infallible> {
            self.confidence = Some(threshold);
            Ok(())
        }

        fn stitch(&mut self, images: &[RgbImage]) -> Result<RawStitch, Infallible> {
            let width = images.iter().map(RgbImage::width).sum();
            let height = images.iter().map(RgbImage::height).max().unwrap_or(0);
            // Encode what the stitcher saw into the result so tests can check it.
            let tag = match self.mode {
                StitchMode::Panorama => 1,
                StitchMode::Scans => 2,
            };
            let confidence_pct = self.confidence.map_or(0, |c| (c * 100.0).round() as u8);
            Ok(RawStitch {
                code: self.code,
                image: Some(RgbImage::from_pixel(
                    width,
                    height,
                    Rgb([tag, confidence_pct, 0]),
                )),
            })
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("backend exploded")]
    struct Boom;

    struct Failing;

    impl Stitcher for Failing {
        type Error = Boom;

        fn set_confidence_threshold(&mut self, _threshold: f64) -> Result<(), Boom> {
            Ok(())
        }

        fn stitch(&mut self, _images: &[RgbImage]) -> Result<RawStitch, Boom> {
            Err(Boom)
        }
    }

    fn images(n: usize, width: u32) -> Vec<RgbImage> {
        (0..n).map(|_| RgbImage::new(width, 4)).collect()
    }

    #[test]
    fn zero_images_is_insufficient() {
        let result = stitch_images(vec![], &StitchConfig::default(), Recording::factory(0));
        assert!(matches!(
            result,
            Err(StitchError::InsufficientImages { count: 0 })
        ));
    }

    #[test]
    fn one_image_is_insufficient() {
        let result = stitch_images(images(1, 6), &StitchConfig::default(), Recording::factory(0));
        assert!(matches!(
            result,
            Err(StitchError::InsufficientImages { count: 1 })
        ));
    }

    #[test]
    fn factory_is_not_called_when_insufficient() {
        let result = stitch_images(images(1, 6), &StitchConfig::default(), |_| {
            Err::<Failing, Boom>(Boom)
        });
        assert!(matches!(result, Err(StitchError::InsufficientImages { .. })));
    }

    #[test]
    fn one_image_split_into_thirds_is_enough() {
        let config = StitchConfig {
            split_into_thirds: true,
            ..StitchConfig::default()
        };
        let stitched = stitch_images(images(1, 9), &config, Recording::factory(0)).unwrap();
        assert_eq!(stitched.pieces, 3);
        assert_eq!(stitched.image.width(), 9);
    }

    #[test]
    fn two_images_stitch_with_mode_and_confidence() {
        let config = StitchConfig {
            method: StitchMode::Scans,
            confidence_threshold: 0.3,
            ..StitchConfig::default()
        };
        let stitched = stitch_images(images(2, 5), &config, Recording::factory(0)).unwrap();
        assert_eq!(stitched.pieces, 2);
        assert_eq!(stitched.image.dimensions(), (10, 4));
        assert_eq!(stitched.image.get_pixel(0, 0), &Rgb([2, 30, 0]));
    }

    #[test]
    fn non_ok_status_is_stitching_failed() {
        let result = stitch_images(images(3, 5), &StitchConfig::default(), Recording::factory(2));
        match result {
            Err(StitchError::StitchingFailed { status, message }) => {
                assert_eq!(status, StitchStatus::HomographyEstimationFailed);
                assert_eq!(message, "Homography estimation failed");
            }
            other => panic!("expected StitchingFailed, got {other:?}"),
        }
    }

    #[test]
    fn unknown_status_reports_unknown_error() {
        let result = stitch_images(images(2, 5), &StitchConfig::default(), Recording::factory(99));
        match result {
            Err(StitchError::StitchingFailed { status, message }) => {
                assert_eq!(status, StitchStatus::Unknown(99));
                assert_eq!(message, UNKNOWN_MESSAGE);
            }
            other => panic!("expected StitchingFailed, got {other:?}"),
        }
    }

    #[test]
    fn backend_error_is_wrapped() {
        let result = stitch_images(images(2, 5), &StitchConfig::default(), |_| {
            Ok::<_, Boom>(Failing)
        });
        match result {
            Err(StitchError::Backend(source)) => assert_eq!(source.to_string(), "backend exploded"),
            other => panic!("expected Backend, got {other:?}"),
        }
    }

    #[test]
    fn from_raw_drops_image_on_failure() {
        let result = StitchResult::from_raw(RawStitch {
            code: 1,
            image: Some(RgbImage::new(2, 2)),
        });
        assert_eq!(result.status, StitchStatus::NeedMoreImages);
        assert!(result.image.is_none());
    }

    #[test]
    fn ok_without_image_is_empty_panorama() {
        let result = StitchResult::from_raw(RawStitch {
            code: 0,
            image: None,
        });
        assert!(matches!(result.into_image(), Err(StitchError::EmptyPanorama)));

        let zero = StitchResult::from_raw(RawStitch {
            code: 0,
            image: Some(RgbImage::new(0, 0)),
        });
        assert!(matches!(zero.into_image(), Err(StitchError::EmptyPanorama)));
    }
}
