//! Stitcher status codes and their user-facing messages.
//!
//! The external stitcher reports its outcome as a small integer. This
//! module owns the fixed mapping from those codes to [`StitchStatus`]
//! values and human-readable messages. Codes missing from the table
//! resolve to [`StitchStatus::Unknown`] and [`UNKNOWN_MESSAGE`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message reported for any status code not present in the table.
pub const UNKNOWN_MESSAGE: &str = "Unknown error";

/// Outcome of a single call into the external stitcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StitchStatus {
    /// The panorama was produced.
    Ok,
    /// Too few images could be matched to build a panorama.
    NeedMoreImages,
    /// The projective transform between matched images could not be found.
    HomographyEstimationFailed,
    /// Bundle adjustment of the camera parameters did not converge.
    CameraParamsAdjustFailed,
    /// A status code the table does not know, carrying the raw value.
    Unknown(i32),
}

/// Raw code, status, and message for every known status.
///
/// Codes follow `cv::Stitcher::Status`.
const STATUS_TABLE: [(i32, StitchStatus, &str); 4] = [
    (0, StitchStatus::Ok, "OK"),
    (1, StitchStatus::NeedMoreImages, "Not enough images for stitching"),
    (
        2,
        StitchStatus::HomographyEstimationFailed,
        "Homography estimation failed",
    ),
    (
        3,
        StitchStatus::CameraParamsAdjustFailed,
        "Camera parameter adjustment failed",
    ),
];

impl StitchStatus {
    /// Resolve a raw stitcher status code.
    ///
    /// Never fails: codes outside the table become [`Self::Unknown`].
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(known, _, _)| *known == code)
            .map_or(Self::Unknown(code), |&(_, status, _)| status)
    }

    /// The raw status code this value was resolved from.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown(code) => code,
            known => STATUS_TABLE
                .iter()
                .find(|(_, status, _)| *status == known)
                .map_or(-1, |&(code, _, _)| code),
        }
    }

    /// Human-readable message for this status.
    #[must_use]
    pub fn message(self) -> &'static str {
        STATUS_TABLE
            .iter()
            .find(|(_, status, _)| *status == self)
            .map_or(UNKNOWN_MESSAGE, |&(_, _, message)| message)
    }

    /// Returns `true` only for [`Self::Ok`].
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for StitchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::NeedMoreImages => "ERR_NEED_MORE_IMGS",
            Self::HomographyEstimationFailed => "ERR_HOMOGRAPHY_EST_FAIL",
            Self::CameraParamsAdjustFailed => "ERR_CAMERA_PARAMS_ADJUST_FAIL",
            Self::Unknown(_) => "UNKNOWN",
        };
        write!(f, "{name} ({})", self.code())
    }
}
