//! Internal system of units
//!
//! Quantities are stored in the units of the transport engine: millimetre,
//! nanosecond and MeV. Multiply by a constant to go into internal units and
//! divide by it to come back out.
//!
//! ```rust
//! # use foiltools_geometry::units::{cm, keV, um, MeV};
//! let thickness = 15.0 * um;
//! assert!((thickness / cm - 0.0015).abs() < 1e-15);
//! assert!(((2.0 * MeV) / keV - 2000.0).abs() < 1e-9);
//! ```
#![allow(non_upper_case_globals, missing_docs)]

// length
pub const mm: f64 = 1.0;
pub const cm: f64 = 10.0 * mm;
pub const m: f64 = 1000.0 * mm;
pub const um: f64 = 1.0e-3 * mm;
pub const nm: f64 = 1.0e-6 * mm;

// time
pub const ns: f64 = 1.0;
pub const s: f64 = 1.0e9 * ns;

// energy
pub const MeV: f64 = 1.0;
pub const keV: f64 = 1.0e-3 * MeV;
pub const eV: f64 = 1.0e-6 * MeV;

// mass, amount and derived material units
pub const e_SI: f64 = 1.602176634e-19;
pub const joule: f64 = eV / e_SI;
pub const kg: f64 = joule * s * s / (m * m);
pub const g: f64 = 1.0e-3 * kg;
pub const mole: f64 = 1.0;
pub const cm3: f64 = cm * cm * cm;
pub const pascal: f64 = joule / (m * m * m);
pub const atmosphere: f64 = 101325.0 * pascal;
pub const kelvin: f64 = 1.0;

/// Tolerance used when comparing box surfaces
///
/// Faces closer than this are considered touching rather than overlapping.
pub const SURFACE_TOLERANCE: f64 = 1.0e-9 * mm;
