//! Shared types for the panstitch stitching pipeline.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::status::StitchStatus;

/// Re-export `RgbImage` so downstream crates can pass images around
/// without depending on `image` directly.
pub use image::RgbImage;

/// Stitching model handed to the external stitcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StitchMode {
    /// Images share a common viewpoint and differ by rotation.
    Panorama,
    /// Images of a flat surface that differ by translation only.
    Scans,
}

impl StitchMode {
    /// Every accepted method name, in help-text order.
    pub const NAMES: [&'static str; 2] = ["panorama", "scans"];

    /// The CLI name of this mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Panorama => "panorama",
            Self::Scans => "scans",
        }
    }
}

impl fmt::Display for StitchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StitchMode {
    type Err = ConfigError;

    /// Only the exact lowercase names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "panorama" => Ok(Self::Panorama),
            "scans" => Ok(Self::Scans),
            other => Err(ConfigError::InvalidMethod(other.to_owned())),
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an in-memory image.
    #[must_use]
    pub fn of(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    /// Returns `true` if either axis is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Unvalidated stitching parameters, as read from the command line.
///
/// [`StitchConfig::try_new`] turns these into a validated config.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigParams {
    /// Directory holding the input images. Empty means the working directory.
    pub directory: PathBuf,
    /// File extension of the input images, with or without a leading dot.
    pub extension: String,
    /// Stitching method name.
    pub method: String,
    /// Pairwise match confidence threshold.
    pub confidence_threshold: f64,
    /// Output path; `None` or empty selects the default name.
    pub output_path: Option<PathBuf>,
    /// Show the result and enable extended logging.
    pub debug: bool,
    /// Feed each image to the stitcher as three vertical slices.
    pub split_into_thirds: bool,
}

impl Default for ConfigParams {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            extension: StitchConfig::DEFAULT_EXTENSION.to_owned(),
            method: StitchConfig::DEFAULT_METHOD.name().to_owned(),
            confidence_threshold: StitchConfig::DEFAULT_CONFIDENCE_THRESHOLD,
            output_path: None,
            debug: false,
            split_into_thirds: false,
        }
    }
}

/// Validated configuration for one stitching run.
///
/// Built once at startup via [`StitchConfig::try_new`] and passed by
/// reference to every stage. Fields are public for inspection; code that
/// mutates them should call [`StitchConfig::validate`] afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Directory holding the input images. Empty means the working directory.
    pub directory: PathBuf,

    /// File extension of the input images, without a leading dot.
    pub extension: String,

    /// Stitching model for the external stitcher.
    pub method: StitchMode,

    /// Minimum pairwise match confidence, in `[0.0, 1.0]`.
    ///
    /// Higher values make the stitcher reject more image pairs.
    pub confidence_threshold: f64,

    /// Where the stitched image is written. Empty disables writing.
    pub output_path: PathBuf,

    /// Show the stitched image and wait for it to be dismissed.
    pub debug: bool,

    /// Replace every input image by three vertical slices before stitching.
    pub split_into_thirds: bool,
}

impl StitchConfig {
    /// Default input image extension.
    pub const DEFAULT_EXTENSION: &'static str = "jpg";

    /// Default stitching model.
    pub const DEFAULT_METHOD: StitchMode = StitchMode::Panorama;

    /// Default match confidence threshold.
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

    /// File stem of the default output path.
    pub const DEFAULT_OUTPUT_STEM: &'static str = "stitched_image";

    /// Accepted range for [`confidence_threshold`](Self::confidence_threshold).
    pub const CONFIDENCE_RANGE: RangeInclusive<f64> = 0.0..=1.0;

    /// Validate raw parameters and resolve defaults.
    ///
    /// The default output path is derived after the extension has been
    /// normalized, so `-e .png` yields `stitched_image.png`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMethod`] unless the method is exactly
    /// `panorama` or `scans`.
    /// Returns [`ConfigError::ConfidenceOutOfRange`] if the threshold is
    /// outside `[0.0, 1.0]` or NaN.
    /// Returns [`ConfigError::EmptyExtension`] if the extension is blank.
    pub fn try_new(params: ConfigParams) -> Result<Self, ConfigError> {
        let method: StitchMode = params.method.parse()?;
        let confidence_threshold = validate_confidence(params.confidence_threshold)?;

        let extension = params.extension.trim_start_matches('.').to_owned();
        if extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }

        let output_path = match params.output_path {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => Self::default_output_path(&extension),
        };

        Ok(Self {
            directory: params.directory,
            extension,
            method,
            confidence_threshold,
            output_path,
            debug: params.debug,
            split_into_thirds: params.split_into_thirds,
        })
    }

    /// `stitched_image.<extension>`.
    #[must_use]
    pub fn default_output_path(extension: &str) -> PathBuf {
        PathBuf::from(format!("{}.{extension}", Self::DEFAULT_OUTPUT_STEM))
    }

    /// Re-check the invariants of an already-built config.
    ///
    /// # Errors
    ///
    /// Same conditions as [`try_new`](Self::try_new), except the method,
    /// which is already typed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_confidence(self.confidence_threshold)?;
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::EmptyExtension);
        }
        Ok(())
    }

    /// The glob-style pattern the input files are matched against.
    #[must_use]
    pub fn source_pattern(&self) -> String {
        format!("{}/*.{}", self.directory.display(), self.extension)
    }

    /// Whether the result should be written to disk.
    #[must_use]
    pub fn writes_output(&self) -> bool {
        !self.output_path.as_os_str().is_empty()
    }
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            extension: Self::DEFAULT_EXTENSION.to_owned(),
            method: Self::DEFAULT_METHOD,
            confidence_threshold: Self::DEFAULT_CONFIDENCE_THRESHOLD,
            output_path: Self::default_output_path(Self::DEFAULT_EXTENSION),
            debug: false,
            split_into_thirds: false,
        }
    }
}

fn validate_confidence(value: f64) -> Result<f64, ConfigError> {
    if StitchConfig::CONFIDENCE_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::ConfidenceOutOfRange(value))
    }
}

/// Invalid stitching parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The method is not one of [`StitchMode::NAMES`].
    #[error("invalid stitching method `{0}`; supported methods: panorama, scans")]
    InvalidMethod(String),

    /// The confidence threshold is outside `[0.0, 1.0]`.
    #[error("invalid confidence threshold {0}; confidence must be in the range [0.0, 1.0]")]
    ConfidenceOutOfRange(f64),

    /// The image extension is empty.
    #[error("image extension must not be empty")]
    EmptyExtension,
}

/// Result of one call into the external stitcher, after status mapping.
///
/// `image` is only ever present when `status` is [`StitchStatus::Ok`].
#[derive(Debug, Clone, PartialEq)]
pub struct StitchResult {
    /// Resolved stitcher status.
    pub status: StitchStatus,
    /// The stitched image, when the stitcher succeeded.
    pub image: Option<RgbImage>,
}

/// Errors raised while stitching an in-memory image set.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    /// Fewer than [`MIN_IMAGES`](crate::MIN_IMAGES) images after splitting.
    #[error("insufficient number of images for stitching: found {count}, need at least 2")]
    InsufficientImages {
        /// Number of images that would have been stitched.
        count: usize,
    },

    /// The external stitcher reported a non-OK status.
    #[error("stitching failed; status={status}; {message}")]
    StitchingFailed {
        /// Resolved status.
        status: StitchStatus,
        /// Message from the status table.
        message: &'static str,
    },

    /// The stitcher reported success without producing an image.
    #[error("stitcher reported success but returned an empty image")]
    EmptyPanorama,

    /// The backend itself raised an error (creation, configuration, or call).
    #[error("stitching backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StitchError {
    /// Wrap a backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params() -> ConfigParams {
        ConfigParams::default()
    }

    #[test]
    fn defaults_resolve_to_documented_values() {
        let config = StitchConfig::try_new(params()).unwrap();
        assert_eq!(config.extension, "jpg");
        assert_eq!(config.method, StitchMode::Panorama);
        assert!((config.confidence_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.output_path, PathBuf::from("stitched_image.jpg"));
        assert!(!config.debug);
        assert!(!config.split_into_thirds);
        assert_eq!(config, StitchConfig::default());
    }

    #[test]
    fn omitted_output_follows_extension() {
        let config = StitchConfig::try_new(ConfigParams {
            extension: "png".to_owned(),
            ..params()
        })
        .unwrap();
        assert_eq!(config.output_path, PathBuf::from("stitched_image.png"));
    }

    #[test]
    fn empty_output_is_treated_as_omitted() {
        let config = StitchConfig::try_new(ConfigParams {
            extension: "tif".to_owned(),
            output_path: Some(PathBuf::new()),
            ..params()
        })
        .unwrap();
        assert_eq!(config.output_path, PathBuf::from("stitched_image.tif"));
    }

    #[test]
    fn explicit_output_is_kept() {
        let config = StitchConfig::try_new(ConfigParams {
            output_path: Some(PathBuf::from("out/pano.png")),
            ..params()
        })
        .unwrap();
        assert_eq!(config.output_path, PathBuf::from("out/pano.png"));
    }

    #[test]
    fn leading_dot_is_stripped_from_extension() {
        let config = StitchConfig::try_new(ConfigParams {
            extension: ".png".to_owned(),
            ..params()
        })
        .unwrap();
        assert_eq!(config.extension, "png");
        assert_eq!(config.output_path, PathBuf::from("stitched_image.png"));
    }

    #[test]
    fn empty_extension_is_rejected() {
        let result = StitchConfig::try_new(ConfigParams {
            extension: ".".to_owned(),
            ..params()
        });
        assert_eq!(result, Err(ConfigError::EmptyExtension));
    }

    #[test]
    fn confidence_bounds_are_inclusive() {
        for value in [0.0, 1.0, 0.5] {
            let config = StitchConfig::try_new(ConfigParams {
                confidence_threshold: value,
                ..params()
            });
            assert!(config.is_ok(), "{value} should be accepted");
        }
    }

    #[test]
    fn confidence_outside_range_is_rejected() {
        for value in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let result = StitchConfig::try_new(ConfigParams {
                confidence_threshold: value,
                ..params()
            });
            assert!(
                matches!(result, Err(ConfigError::ConfidenceOutOfRange(_))),
                "{value} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn scans_method_is_accepted() {
        let config = StitchConfig::try_new(ConfigParams {
            method: "scans".to_owned(),
            ..params()
        })
        .unwrap();
        assert_eq!(config.method, StitchMode::Scans);
    }

    #[test]
    fn unsupported_methods_are_rejected() {
        for method in ["cylindrical", "spherical", "Panorama", "", " scans"] {
            let result = StitchConfig::try_new(ConfigParams {
                method: method.to_owned(),
                ..params()
            });
            assert_eq!(
                result,
                Err(ConfigError::InvalidMethod(method.to_owned())),
                "method {method:?}"
            );
        }
    }

    #[test]
    fn validate_catches_mutated_confidence() {
        let mut config = StitchConfig::default();
        assert!(config.validate().is_ok());
        config.confidence_threshold = 2.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ConfidenceOutOfRange(2.0))
        );
    }

    #[test]
    fn source_pattern_joins_directory_and_extension() {
        let config = StitchConfig {
            directory: PathBuf::from("shots"),
            extension: "png".to_owned(),
            ..StitchConfig::default()
        };
        assert_eq!(config.source_pattern(), "shots/*.png");
    }

    #[test]
    fn mode_names_round_trip() {
        for name in StitchMode::NAMES {
            let mode: StitchMode = name.parse().unwrap();
            assert_eq!(mode.to_string(), name);
        }
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&StitchMode::Scans).unwrap();
        assert_eq!(json, "\"scans\"");
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::InvalidMethod("cylindrical".to_owned()).to_string(),
            "invalid stitching method `cylindrical`; supported methods: panorama, scans"
        );
        assert_eq!(
            ConfigError::ConfidenceOutOfRange(1.5).to_string(),
            "invalid confidence threshold 1.5; confidence must be in the range [0.0, 1.0]"
        );
    }

    #[test]
    fn stitching_failed_message_carries_status() {
        let status = StitchStatus::from_code(1);
        let err = StitchError::StitchingFailed {
            status,
            message: status.message(),
        };
        assert_eq!(
            err.to_string(),
            "stitching failed; status=ERR_NEED_MORE_IMGS (1); Not enough images for stitching"
        );
    }

    #[test]
    fn dimensions_of_image() {
        let img = RgbImage::new(7, 3);
        let dims = Dimensions::of(&img);
        assert_eq!(dims, Dimensions { width: 7, height: 3 });
        assert_eq!(dims.to_string(), "7x3");
        assert!(!dims.is_empty());
        assert!(Dimensions::of(&RgbImage::new(0, 3)).is_empty());
    }
}
