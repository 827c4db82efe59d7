//! panstitch: stitch a directory of overlapping images from the command line.
//!
//! Reads the parameters, finds `<DIRECTORY>/*.<EXTENSION>`, hands the
//! images to the OpenCV stitcher, and writes (and with `--debug`, shows)
//! the result.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin panstitch -- -d shots -e jpg -o pano.jpg
//! ```
//!
//! Without the default `opencv` feature the binary still reads and
//! validates its arguments but cannot stitch.
//!
//! Exits with 0 on success, `--help` or `--version`, and -1 (255) on any
//! error.

#![allow(clippy::print_stdout, clippy::print_stderr)]

#[cfg(feature = "opencv")]
mod backend;
mod logging;
mod params;

use std::process::ExitCode;

use panstitch_io::{RunError, RunReport};
use panstitch_pipeline::StitchConfig;

use crate::params::{Invocation, Options, ParamError};

/// Process status for every failure, seen by the shell as -1.
const EXIT_FAILURE: u8 = 255;

/// Errors reported by the binary itself.
#[derive(Debug, thiserror::Error)]
enum AppError {
    /// The run failed.
    #[error(transparent)]
    Run(#[from] RunError),

    /// This binary was built without a stitching backend.
    #[error("no stitching backend available; rebuild with the `opencv` feature")]
    BackendUnavailable,

    /// The report could not be rendered as JSON.
    #[error("failed to serialize run report: {0}")]
    Report(#[from] serde_json::Error),
}

#[cfg(feature = "opencv")]
fn stitch(config: &StitchConfig) -> Result<RunReport, AppError> {
    let report = panstitch_io::run(
        config,
        backend::OpenCvStitcher::create,
        &mut backend::HighGuiViewer,
    )?;
    Ok(report)
}

#[cfg(not(feature = "opencv"))]
fn stitch(config: &StitchConfig) -> Result<RunReport, AppError> {
    log::debug!(
        "Refusing to stitch {} without a backend",
        config.source_pattern()
    );
    Err(AppError::BackendUnavailable)
}

/// Stitch and print the outcome.
fn execute(options: &Options) -> Result<(), AppError> {
    let report = stitch(&options.config)?;
    log::info!("{}", report.summary());
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Image stitching successful");
    }
    Ok(())
}

fn main() -> ExitCode {
    let invocation = match params::read(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(ParamError::InvalidArgument(message)) => {
            eprintln!("{message}");
            eprintln!();
            eprintln!("{}", params::help_text());
            return ExitCode::from(EXIT_FAILURE);
        }
        Err(err @ ParamError::Validation(_)) => {
            eprintln!("Error: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let options = match invocation {
        Invocation::Help(text) | Invocation::Version(text) => {
            println!("{}", text.trim_end());
            return ExitCode::SUCCESS;
        }
        Invocation::Run(options) => options,
    };

    logging::init(options.config.debug);
    log::debug!("Config: {:#?}", options.config);

    match execute(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Image stitching failed");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "opencv"))]
    #[test]
    fn without_backend_stitching_is_unavailable() {
        let result = stitch(&StitchConfig::default());
        assert!(matches!(result, Err(AppError::BackendUnavailable)));
    }

    #[test]
    fn backend_is_a_default_feature() {
        let manifest = include_str!("../Cargo.toml");
        assert!(
            manifest.lines().any(|line| line.trim() == r#"default = ["opencv"]"#),
            "the OpenCV backend must be enabled by default"
        );
    }

    #[test]
    fn run_errors_keep_their_message() {
        let err = AppError::from(RunError::Stitch(
            panstitch_pipeline::StitchError::InsufficientImages { count: 1 },
        ));
        assert_eq!(
            err.to_string(),
            "insufficient number of images for stitching: found 1, need at least 2"
        );
    }
}
