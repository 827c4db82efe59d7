//! Summary of a successful run, for logging and `--json` output.
//!
//! The elapsed time is written as integer milliseconds under `elapsed_ms`.

use std::path::PathBuf;
use std::time::Duration;

use panstitch_pipeline::{Dimensions, StitchMode};
use serde::{Deserialize, Serialize};

/// `elapsed` as whole milliseconds, saturating at `u64::MAX`.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// What a successful run consumed and produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Input files, in the order they were stitched.
    pub inputs: Vec<PathBuf>,
    /// Images handed to the stitcher, after any splitting.
    pub pieces: usize,
    /// Stitching model used.
    pub method: StitchMode,
    /// Match confidence threshold used.
    pub confidence_threshold: f64,
    /// Size of the stitched image.
    pub dimensions: Dimensions,
    /// Where the result was written, if anywhere.
    pub output: Option<PathBuf>,
    /// Wall-clock time for the whole run, including any debug display.
    #[serde(rename = "elapsed_ms", with = "millis")]
    pub elapsed: Duration,
}

impl RunReport {
    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let output = self
            .output
            .as_ref()
            .map_or_else(|| "not saved".to_owned(), |p| format!("saved to {}", p.display()));
        format!(
            "Stitched {} files ({} pieces, {}) into {} in {:.2?}; {output}",
            self.inputs.len(),
            self.pieces,
            self.method,
            self.dimensions,
            self.elapsed,
        )
    }
}
