//! Scoring volume classification

// crate modules
use crate::error::Error;
use crate::geometry::LogicalId;

// foiltools modules
use foiltools_format::f;

// external crates
use serde::{Deserialize, Serialize};

/// Regions of the target that steps are classified into
///
/// Each variant carries the integer code written to the `volumeName` column
/// of the step data files. Note the codes do not follow the nesting order.
///
/// | Code | Volume   | Description                  |
/// | ---- | -------- | ---------------------------- |
/// | 0    | World    | anything outside the others  |
/// | 1    | FoilAl   | first (aluminium slot) foil  |
/// | 2    | FoilTa   | second (tantalum) foil       |
/// | 3    | Envelope | gas volume holding the foils |
///
/// ```rust
/// # use foiltools_geometry::Volume;
/// assert_eq!(Volume::FoilTa.code(), 2);
/// assert_eq!(Volume::Envelope, Volume::try_from(3).unwrap());
///
/// // Codes that do not exist fall back to the world
/// assert_eq!(Volume::World, Volume::from_code(17));
/// ```
#[repr(u8)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Volume {
    /// Anything outside the other volumes
    #[default]
    World = 0,
    /// Aluminium slot foil
    FoilAl = 1,
    /// Tantalum foil
    FoilTa = 2,
    /// Gas envelope holding the foils
    Envelope = 3,
}

impl Volume {
    /// All volumes in code order
    pub const ALL: [Volume; 4] = [
        Volume::World,
        Volume::FoilAl,
        Volume::FoilTa,
        Volume::Envelope,
    ];

    /// Integer code used in output files
    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Convert from a code, mapping anything unknown to [Volume::World]
    pub fn from_code(code: u8) -> Self {
        Self::try_from(code).unwrap_or_default()
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            Volume::World => "World",
            Volume::FoilAl => "FoilAl",
            Volume::FoilTa => "FoilTa",
            Volume::Envelope => "Envelope",
        }
    }
}

impl TryFrom<u8> for Volume {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::World),
            1 => Ok(Self::FoilAl),
            2 => Ok(Self::FoilTa),
            3 => Ok(Self::Envelope),
            _ => Err(Error::FailedToInferVolume(f!("{code}"))),
        }
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Logical volume handles used to classify steps
///
/// Produced by [DetectorConstruction](crate::DetectorConstruction) and handed
/// directly to whatever records steps, so classification never needs to go
/// looking for the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringVolumes {
    /// Gas envelope holding the foils
    pub envelope: LogicalId,
    /// Aluminium slot foil, shared by all of its slabs
    pub foil_al: LogicalId,
    /// Tantalum foil, shared by all of its slabs
    pub foil_ta: LogicalId,
}

impl ScoringVolumes {
    /// Classify a logical volume by handle equality
    ///
    /// Anything that is not one of the three scoring handles, including a step
    /// with no volume at all, is [Volume::World].
    pub fn classify(&self, logical: Option<LogicalId>) -> Volume {
        match logical {
            Some(id) if id == self.envelope => Volume::Envelope,
            Some(id) if id == self.foil_al => Volume::FoilAl,
            Some(id) if id == self.foil_ta => Volume::FoilTa,
            _ => Volume::World,
        }
    }

    /// Handle for a scoring volume, `None` for the world
    pub fn handle(&self, volume: Volume) -> Option<LogicalId> {
        match volume {
            Volume::World => None,
            Volume::FoilAl => Some(self.foil_al),
            Volume::FoilTa => Some(self.foil_ta),
            Volume::Envelope => Some(self.envelope),
        }
    }
}
