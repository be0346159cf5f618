//! Recorder configuration

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;

// foiltools modules
use foiltools_stepdat::WriterConfig;

// external crates
use serde::{Deserialize, Serialize};

/// Where and how steps are recorded
///
/// Any field missing from a JSON document takes its default.
///
/// ```rust
/// # use foiltools_recorder::RecorderConfig;
/// let config = RecorderConfig::from_json(r#"{
///     "output_dir": "worker_1",
///     "writer": { "events_per_file": 1000 }
/// }"#).unwrap();
///
/// assert_eq!(config.writer.events_per_file, 1000);
/// assert_eq!(config.writer.prefix, "run_");
/// assert!(!config.strict_volumes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// File naming and rotation
    pub writer: WriterConfig,
    /// Directory the step data files are written to
    pub output_dir: PathBuf,
    /// Fail on steps recorded before the scoring volumes are bound, rather
    /// than classifying them as World
    pub strict_volumes: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            writer: WriterConfig::default(),
            output_dir: PathBuf::from("."),
            strict_volumes: false,
        }
    }
}

impl RecorderConfig {
    /// Configuration with a different output directory
    pub fn in_directory<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
