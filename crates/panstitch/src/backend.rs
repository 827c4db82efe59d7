//! OpenCV stitching and display backend.
//!
//! Wraps `cv::Stitcher` and `highgui` behind the pipeline's [`Stitcher`]
//! and [`Viewer`] traits. Images cross the boundary as 8-bit RGB on the
//! Rust side and 8-bit BGR on the OpenCV side.
//!
//! Only the `_def` variants of `cvt_color` are used, since the full
//! signature differs between OpenCV 4.6 and 4.11+.

use opencv::core::{self, Mat, Vector};
use opencv::prelude::*;
use opencv::{highgui, imgproc, stitching};
use panstitch_pipeline::{RawStitch, RgbImage, StitchMode, Stitcher, Viewer};

/// A `cv::Stitcher` created for one stitching mode.
pub struct OpenCvStitcher {
    inner: core::Ptr<stitching::Stitcher>,
}

impl OpenCvStitcher {
    /// Create the OpenCV stitcher for `mode`.
    ///
    /// # Errors
    ///
    /// Returns the OpenCV error if the stitcher cannot be created.
    pub fn create(mode: StitchMode) -> opencv::Result<Self> {
        let mode = match mode {
            StitchMode::Panorama => stitching::Stitcher_Mode::PANORAMA,
            StitchMode::Scans => stitching::Stitcher_Mode::SCANS,
        };
        log::debug!("Creating OpenCV stitcher ({mode:?})");
        Ok(Self {
            inner: stitching::Stitcher::create(mode)?,
        })
    }
}

impl Stitcher for OpenCvStitcher {
    type Error = opencv::Error;

    fn set_confidence_threshold(&mut self, threshold: f64) -> opencv::Result<()> {
        self.inner.set_pano_confidence_thresh(threshold)
    }

    fn stitch(&mut self, images: &[RgbImage]) -> opencv::Result<RawStitch> {
        let mut mats = Vector::<Mat>::with_capacity(images.len());
        for image in images {
            mats.push(rgb_to_bgr(image)?);
        }

        let mut pano = Mat::default();
        let status = self.inner.stitch(&mats, &mut pano)?;
        let image = if pano.empty() {
            None
        } else {
            Some(bgr_to_rgb(&pano)?)
        };

        Ok(RawStitch {
            code: status as i32,
            image,
        })
    }
}

/// Shows images in a `highgui` window until a key is pressed.
pub struct HighGuiViewer;

impl Viewer for HighGuiViewer {
    type Error = opencv::Error;

    fn show(&mut self, title: &str, image: &RgbImage) -> opencv::Result<()> {
        let mat = rgb_to_bgr(image)?;
        highgui::imshow(title, &mat)?;
        highgui::wait_key(0)?;
        highgui::destroy_window(title)
    }
}

/// Copy an RGB image into a new BGR `Mat`.
fn rgb_to_bgr(image: &RgbImage) -> opencv::Result<Mat> {
    let rows = to_i32(image.height())?;
    let flat = Mat::from_slice(image.as_raw().as_slice())?;
    let rgb = flat.reshape(3, rows)?;
    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&*rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
    Ok(bgr)
}

/// Copy a BGR `Mat` into a new RGB image.
fn bgr_to_rgb(mat: &Mat) -> opencv::Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(mat, &mut rgb, imgproc::COLOR_BGR2RGB)?;
    let width = to_u32(rgb.cols())?;
    let height = to_u32(rgb.rows())?;
    let bytes = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, bytes).ok_or_else(|| {
        opencv::Error::new(
            core::StsUnmatchedSizes,
            format!("stitched Mat is not a {width}x{height} 3-channel 8-bit image"),
        )
    })
}

fn to_i32(value: u32) -> opencv::Result<i32> {
    i32::try_from(value).map_err(|e| opencv::Error::new(core::StsOutOfRange, e.to_string()))
}

fn to_u32(value: i32) -> opencv::Result<u32> {
    u32::try_from(value).map_err(|e| opencv::Error::new(core::StsOutOfRange, e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn rgb_mat_round_trip_preserves_pixels() {
        let image = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 10, y as u8 * 20, 7]));
        let mat = rgb_to_bgr(&image).unwrap();
        assert_eq!((mat.cols(), mat.rows(), mat.channels()), (5, 3, 3));

        // OpenCV stores blue first.
        let first = mat.at_2d::<core::Vec3b>(0, 1).unwrap();
        assert_eq!(first.0, [7, 0, 10]);

        assert_eq!(bgr_to_rgb(&mat).unwrap(), image);
    }

    #[test]
    fn stitcher_is_created_for_both_modes() {
        for mode in [StitchMode::Panorama, StitchMode::Scans] {
            let mut stitcher = OpenCvStitcher::create(mode).unwrap();
            stitcher.set_confidence_threshold(0.8).unwrap();
        }
    }

    #[test]
    fn featureless_images_fail_to_stitch() {
        let mut stitcher = OpenCvStitcher::create(StitchMode::Panorama).unwrap();
        let blank = RgbImage::from_pixel(64, 64, Rgb([128, 128, 128]));
        let raw = stitcher.stitch(&[blank.clone(), blank]).unwrap();
        assert_ne!(raw.code, 0);
    }
}
