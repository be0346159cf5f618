//! Result and Error types for the recorder module

/// Type alias for `Result<T, recorder::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `foiltools-recorder`
pub enum Error {
    /// Scoring volume handles were needed but never bound
    #[error("scoring volumes are unresolved at event {event_id}")]
    VolumeResolution {
        /// Event of the rejected step
        event_id: i32,
    },

    /// Failure to open, write or flush an output file
    #[error("failure in file I/O")]
    FileIo(#[from] std::io::Error),

    /// Failure in the step data layer other than plain I/O
    #[error("step data error")]
    Stepdat(#[source] foiltools_stepdat::Error),

    /// Failure to deserialise a configuration
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),
}

impl From<foiltools_stepdat::Error> for Error {
    fn from(err: foiltools_stepdat::Error) -> Self {
        match err {
            foiltools_stepdat::Error::IOError(e) => Self::FileIo(e),
            other => Self::Stepdat(other),
        }
    }
}
