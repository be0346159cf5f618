//! Materials assigned to logical volumes

// crate modules
use crate::error::{Error, Result};
use crate::units::{atmosphere, cm3, g, kelvin, mole, pascal};

// external crates
use serde::{Deserialize, Serialize};

/// Name used for the near-vacuum gas filling the world and envelope
pub const INTER_GALACTIC: &str = "interGalactic";

/// State of matter for a [Material]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Solid
    #[default]
    Solid,
    /// Liquid
    Liquid,
    /// Gas, including near-vacuum
    Gas,
}

/// Bulk material properties
///
/// Only what the transport engine needs to look the material up is kept.
/// Compounds have no single atomic number or molar mass, so both are
/// optional.
///
/// Densities, temperatures and pressures are stored in internal units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Name of the material, e.g. `G4_Ta`
    pub name: String,
    /// Mass density
    pub density: f64,
    /// State of matter
    pub state: State,
    /// Temperature
    pub temperature: f64,
    /// Pressure
    pub pressure: f64,
    /// Effective atomic number for elemental materials
    pub atomic_number: Option<f64>,
    /// Mass of one mole for elemental materials
    pub molar_mass: Option<f64>,
}

impl Material {
    /// Near-vacuum gas used for every non-foil region of the target
    ///
    /// A single nitrogen-like gas at 1e-25 g/cm3, 300 K and 3e-18 Pa.
    pub fn inter_galactic() -> Self {
        Self {
            name: INTER_GALACTIC.to_string(),
            density: 1.0e-25 * g / cm3,
            state: State::Gas,
            temperature: 300.0 * kelvin,
            pressure: 3.0e-18 * pascal,
            atomic_number: Some(7.0),
            molar_mass: Some(28.02 * g / mole),
        }
    }

    /// Look up a material from the built-in NIST subset
    ///
    /// ```rust
    /// # use foiltools_geometry::Material;
    /// let tantalum = Material::from_nist("G4_Ta").unwrap();
    /// assert_eq!(tantalum.atomic_number, Some(73.0));
    ///
    /// assert!(Material::from_nist("G4_Unobtanium").is_err());
    /// ```
    pub fn from_nist(name: &str) -> Result<Self> {
        let ntp = 293.15 * kelvin;
        let material = match name {
            "G4_Al" => Self::element(name, 2.699, 13.0, 26.9815385, ntp),
            "G4_Ta" => Self::element(name, 16.654, 73.0, 180.94788, ntp),
            "G4_Galactic" => Self {
                state: State::Gas,
                pressure: 3.0e-18 * pascal,
                ..Self::element(name, 1.0e-25, 1.0, 1.01, 2.73 * kelvin)
            },
            "G4_AIR" => Self {
                name: name.to_string(),
                density: 1.20479e-3 * g / cm3,
                state: State::Gas,
                temperature: ntp,
                pressure: atmosphere,
                atomic_number: None,
                molar_mass: None,
            },
            _ => return Err(Error::UnknownMaterial(name.to_string())),
        };
        Ok(material)
    }

    /// Resolve a configured material name
    ///
    /// The special [INTER_GALACTIC] name maps to [Material::inter_galactic()],
    /// anything else goes to [Material::from_nist()].
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            INTER_GALACTIC => Ok(Self::inter_galactic()),
            _ => Self::from_nist(name),
        }
    }

    /// Solid element at standard pressure, density given in g/cm3
    fn element(name: &str, density: f64, z: f64, a: f64, temperature: f64) -> Self {
        Self {
            name: name.to_string(),
            density: density * g / cm3,
            state: State::Solid,
            temperature,
            pressure: atmosphere,
            atomic_number: Some(z),
            molar_mass: Some(a * g / mole),
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} ({:?}, {:.5e} g/cm3)",
            self.name,
            self.state,
            self.density / (g / cm3)
        )
    }
}
