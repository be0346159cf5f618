//! Result and Error types for the geometry module

/// Type alias for `Result<T, geometry::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `foiltools-geometry`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to deserialise a JSON configuration
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// Material name not found in the built-in table
    #[error("material \"{0}\" is not in the built-in material table")]
    UnknownMaterial(String),

    /// Configuration values that can not describe a valid target
    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),

    /// Placement request that does not make sense for the current tree
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// Daughter volume extends past the boundary of its mother
    #[error("volume \"{daughter}\" extends outside its mother \"{mother}\"")]
    OutsideMother {
        /// Name of the daughter placement
        daughter: String,
        /// Name of the mother volume
        mother: String,
    },

    /// Daughter volume overlaps one of its siblings
    #[error("volume \"{placed}\" overlaps existing volume \"{existing}\"")]
    Overlap {
        /// Placement being added
        placed: String,
        /// Sibling it overlaps
        existing: String,
    },

    /// Logical volume handle not known to this geometry
    #[error("no logical volume with index {0}")]
    UnknownLogical(usize),

    /// Physical volume handle not known to this geometry
    #[error("no physical volume with index {0}")]
    UnknownPhysical(usize),

    /// Failure to map a code or name onto a scoring volume
    #[error("failed to infer volume from \"{0}\"")]
    FailedToInferVolume(String),
}
