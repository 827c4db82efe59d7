//! panstitch-io: filesystem side of a stitching run.
//!
//! Finds the input files, decodes them, hands them to
//! `panstitch_pipeline::stitch_images`, and shows and/or writes the
//! result. The stitcher and display backends are supplied by the caller.

pub mod decode;
pub mod discover;
pub mod encode;
pub mod error;
pub mod report;

use std::time::Instant;

use panstitch_pipeline::{Dimensions, StitchConfig, StitchMode, Stitcher, Viewer, stitch_images};

pub use error::RunError;
pub use report::RunReport;

/// Title of the debug display window.
pub const WINDOW_TITLE: &str = "Stitched Image";

/// Run one stitch from directory to output file.
///
/// # Steps
///
/// 1. Re-validate `config`
/// 2. List `config.directory/*.{config.extension}`, sorted
/// 3. Decode every file (the first failure aborts the run)
/// 4. Split, count, and stitch via [`stitch_images`]
/// 5. If `config.debug`, show the result and wait for it to be dismissed
/// 6. If `config.output_path` is non-empty, write the result
///
/// # Errors
///
/// Returns [`RunError::Config`] if `config` is invalid.
/// Returns [`RunError::DirectoryRead`] if the directory cannot be listed.
/// Returns [`RunError::ImageRead`] if any matched file fails to decode.
/// Returns [`RunError::Stitch`] for too few images, a backend error, or a
/// non-OK stitcher status.
/// Returns [`RunError::Display`] if the debug display fails.
/// Returns [`RunError::OutputWrite`] if the result cannot be written.
pub fn run<S, F, V>(
    config: &StitchConfig,
    make_stitcher: F,
    viewer: &mut V,
) -> Result<RunReport, RunError>
where
    S: Stitcher,
    F: FnOnce(StitchMode) -> Result<S, S::Error>,
    V: Viewer,
{
    let start = Instant::now();
    config.validate()?;

    // 1. Discover.
    log::info!("Searching {}", config.source_pattern());
    let inputs = discover::discover(&config.directory, &config.extension)?;
    log::info!("Found {} images", inputs.len());

    // 2. Decode.
    let images = decode::load_images(&inputs)?;

    // 3. Stitch.
    let stitched = stitch_images(images, config, make_stitcher)?;
    let dimensions = Dimensions::of(&stitched.image);
    log::info!("Stitched image is {dimensions}");

    // 4. Optional display.
    if config.debug {
        viewer
            .show(WINDOW_TITLE, &stitched.image)
            .map_err(|e| RunError::Display(Box::new(e)))?;
    }

    // 5. Optional write.
    let output = if config.writes_output() {
        encode::save_image(&config.output_path, &stitched.image)?;
        Some(config.output_path.clone())
    } else {
        None
    };

    Ok(RunReport {
        inputs,
        pieces: stitched.pieces,
        method: config.method,
        confidence_threshold: config.confidence_threshold,
        dimensions,
        output,
        elapsed: start.elapsed(),
    })
}
