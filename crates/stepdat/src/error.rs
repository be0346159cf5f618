//! Result and Error types for the step data module

// standard library
use std::path::PathBuf;

/// Type alias for `Result<T, stepdat::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `foiltools-stepdat`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// Generic error type for nom parser results
    #[error("parser failed: {0}")]
    ParseError(String),

    /// Header line does not describe the expected columns
    #[error("unexpected header (expected {expected:?}, found {found:?})")]
    UnexpectedHeader {
        /// Header this crate writes
        expected: String,
        /// Header found in the file
        found: String,
    },

    /// File has no header line at all
    #[error("file {0:?} has no header")]
    MissingHeader(PathBuf),

    /// Volume code that does not correspond to any scoring volume
    #[error("unknown volume code {0}")]
    UnknownVolumeCode(u8),

    /// No run files found for the requested prefix
    #[error("no run files found in {0:?}")]
    NoRunFiles(PathBuf),

    /// Particle name that would not survive being read back
    #[error("invalid particle name {0:?}, must be non-empty with no whitespace")]
    InvalidParticleName(String),

    /// Attempt to write after the writer was closed
    #[error("step data writer has already been closed")]
    WriterClosed,
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Self::ParseError(format!("{err:?}"))
    }
}
