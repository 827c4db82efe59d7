//! Command-line parameter reading.
//!
//! Turns `argv` into an [`Invocation`]: a validated run configuration,
//! or the help/version text to print before exiting successfully.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use panstitch_pipeline::{ConfigError, ConfigParams, StitchConfig};

/// Text printed for `--version`.
pub const VERSION_TEXT: &str = concat!("panstitch version ", env!("CARGO_PKG_VERSION"));

/// Stitch a directory of overlapping images into a single image.
///
/// Every file matching `<DIRECTORY>/*.<EXTENSION>` is handed to the
/// stitcher. On success the result is written to `--output` and, with
/// `--debug`, shown in a window until a key is pressed.
#[derive(Debug, Parser)]
#[command(name = "panstitch", disable_version_flag = true)]
struct Cli {
    /// Print version information.
    #[arg(short = 'v', long)]
    version: bool,

    /// Directory containing the input images (empty: current directory).
    #[arg(short, long, default_value = "")]
    directory: String,

    /// File extension of the images to be stitched.
    #[arg(short, long, default_value = StitchConfig::DEFAULT_EXTENSION)]
    extension: String,

    /// Stitching method: panorama or scans.
    #[arg(short, long, default_value = StitchConfig::DEFAULT_METHOD.name())]
    method: String,

    /// Confidence threshold for feature matching, in [0.0, 1.0].
    #[arg(
        short,
        long,
        default_value_t = StitchConfig::DEFAULT_CONFIDENCE_THRESHOLD,
        allow_negative_numbers = true
    )]
    confidence: f64,

    /// Path for saving the stitched image [default: stitched_image.<EXTENSION>].
    #[arg(short, long)]
    output: Option<String>,

    /// Show the stitched image and enable extended debug output.
    #[arg(long)]
    debug: bool,

    /// Feed each image to the stitcher as three vertical slices.
    #[arg(long)]
    split_thirds: bool,

    /// Print a JSON run report to stdout on success.
    #[arg(long)]
    json: bool,
}

/// A validated run request.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Stitching configuration.
    pub config: StitchConfig,
    /// Emit the run report as JSON.
    pub json: bool,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Stitch with these options.
    Run(Options),
    /// Print this help text and exit successfully.
    Help(String),
    /// Print this version text and exit successfully.
    Version(String),
}

/// Command-line errors.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// Unknown flag, missing value, or a value of the wrong type.
    #[error("{0}")]
    InvalidArgument(String),

    /// Values parsed but violate a configuration invariant.
    #[error(transparent)]
    Validation(#[from] ConfigError),
}

/// Read command-line arguments (including the program name).
///
/// Help and version requests short-circuit before any validation.
///
/// # Errors
///
/// Returns [`ParamError::InvalidArgument`] for anything `clap` rejects.
/// Returns [`ParamError::Validation`] for an unsupported method, an
/// out-of-range confidence, or an empty extension.
pub fn read<I, T>(args: I) -> Result<Invocation, ParamError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            return Ok(Invocation::Help(err.render().to_string()));
        }
        Err(err) => {
            return Err(ParamError::InvalidArgument(
                err.render().to_string().trim_end().to_owned(),
            ));
        }
    };

    if cli.version {
        return Ok(Invocation::Version(VERSION_TEXT.to_owned()));
    }

    let config = StitchConfig::try_new(ConfigParams {
        directory: PathBuf::from(cli.directory),
        extension: cli.extension,
        method: cli.method,
        confidence_threshold: cli.confidence,
        output_path: cli.output.map(PathBuf::from),
        debug: cli.debug,
        split_into_thirds: cli.split_thirds,
    })?;

    Ok(Invocation::Run(Options {
        config,
        json: cli.json,
    }))
}

/// The option description printed for `--help` and after argument errors.
#[must_use]
pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}
