//! Optional pre-processing: split each image into vertical thirds.
//!
//! Presenting the stitcher with more, smaller pieces can help it find
//! matches on some inputs. Each slice spans the full image height and
//! `width / 3` columns; any remainder columns on the right are dropped.

use image::imageops;

use crate::types::RgbImage;

/// Number of slices produced per image.
pub const SLICES: u32 = 3;

/// Split `image` into three equal-width vertical slices, left to right.
///
/// Returns `None` when the image is narrower than [`SLICES`] pixels and
/// would produce empty slices.
#[must_use]
pub fn split_into_thirds(image: &RgbImage) -> Option<[RgbImage; 3]> {
    let (width, height) = image.dimensions();
    let slice_width = width / SLICES;
    if slice_width == 0 || height == 0 {
        return None;
    }

    let slice = |index: u32| {
        imageops::crop_imm(image, index * slice_width, 0, slice_width, height).to_image()
    };
    Some([slice(0), slice(1), slice(2)])
}

/// Split every image in order, keeping images too narrow to split whole.
#[must_use]
pub fn split_all(images: Vec<RgbImage>) -> Vec<RgbImage> {
    let mut out = Vec::with_capacity(images.len() * SLICES as usize);
    for (index, image) in images.into_iter().enumerate() {
        if let Some(slices) = split_into_thirds(&image) {
            log::debug!(
                "Split image {index} ({}x{}) into {SLICES} slices of {}x{}",
                image.width(),
                image.height(),
                slices[0].width(),
                slices[0].height(),
            );
            out.extend(slices);
        } else {
            log::warn!(
                "Image {index} ({}x{}) is too narrow to split; using it whole",
                image.width(),
                image.height(),
            );
            out.push(image);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use image::Rgb;

    use super::*;

    /// Each pixel encodes its own column so slices can be traced back.
    fn column_coded(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn slices_have_floor_width_and_full_height() {
        let img = column_coded(10, 4);
        let slices = split_into_thirds(&img).unwrap();
        for slice in &slices {
            assert_eq!(slice.dimensions(), (3, 4));
        }
    }

    #[test]
    fn slices_are_contiguous_without_overlap() {
        let img = column_coded(9, 2);
        let slices = split_into_thirds(&img).unwrap();
        for (i, slice) in slices.iter().enumerate() {
            for (x, y, pixel) in slice.enumerate_pixels() {
                let source_x = i as u32 * 3 + x;
                assert_eq!(pixel, img.get_pixel(source_x, y));
            }
        }
    }

    #[test]
    fn remainder_columns_are_dropped() {
        let img = column_coded(11, 1);
        let slices = split_into_thirds(&img).unwrap();
        // 11 / 3 = 3, so columns 9 and 10 never appear.
        let last = &slices[2];
        assert_eq!(last.width(), 3);
        assert_eq!(last.get_pixel(2, 0).0[0], 8);
    }

    #[test]
    fn too_narrow_returns_none() {
        assert!(split_into_thirds(&column_coded(2, 5)).is_none());
        assert!(split_into_thirds(&column_coded(0, 0)).is_none());
    }

    #[test]
    fn exactly_three_columns_yields_single_pixel_slices() {
        let slices = split_into_thirds(&column_coded(3, 2)).unwrap();
        for (i, slice) in slices.iter().enumerate() {
            assert_eq!(slice.dimensions(), (1, 2));
            assert_eq!(slice.get_pixel(0, 0).0[0], i as u8);
        }
    }

    #[test]
    fn split_all_triples_the_count_in_order() {
        let a = RgbImage::from_pixel(6, 2, Rgb([1, 0, 0]));
        let b = RgbImage::from_pixel(6, 2, Rgb([2, 0, 0]));
        let out = split_all(vec![a, b]);
        assert_eq!(out.len(), 6);
        let tags: Vec<u8> = out.iter().map(|s| s.get_pixel(0, 0).0[0]).collect();
        assert_eq!(tags, [1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn split_all_keeps_narrow_images_whole() {
        let wide = RgbImage::new(6, 2);
        let narrow = RgbImage::new(2, 2);
        let out = split_all(vec![wide, narrow]);
        assert_eq!(out.len(), 4);
        assert_eq!(out[3].dimensions(), (2, 2));
    }

    #[test]
    fn split_all_of_one_image_yields_three() {
        let out = split_all(vec![column_coded(12, 5)]);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|s| s.dimensions() == (4, 5)));
    }
}
