//! Geometry of the foil-stack target
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod detector;
mod error;
mod geometry;
mod material;
mod solid;
mod volume;

pub mod units;

// Inline anything important for a nice public API
#[doc(inline)]
pub use detector::{Detector, DetectorConfig, DetectorConstruction};

#[doc(inline)]
pub use geometry::{Geometry, LogicalId, LogicalVolume, PhysicalId, PhysicalVolume};

#[doc(inline)]
pub use material::{Material, State, INTER_GALACTIC};

#[doc(inline)]
pub use solid::BoxSolid;

#[doc(inline)]
pub use volume::{ScoringVolumes, Volume};

#[doc(inline)]
pub use error::{Error, Result};
