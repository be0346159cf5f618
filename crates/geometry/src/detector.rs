//! Construction of the foil-stack target
//!
//! The target is a fixed hierarchy:
//!
//! ```text
//! World (12x envelope, interGalactic)
//! └── Envelope (200 x 200 x 300 cm, interGalactic)
//!     ├── foilAl_phy (12 x 12 cm, 15 um thick) x al_bins
//!     └── foilTa_phy (12 x 12 cm, 100 um thick) x ta_bins, 1 cm downstream
//! ```

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::geometry::{Geometry, LogicalVolume, PhysicalId};
use crate::material::{Material, INTER_GALACTIC};
use crate::solid::BoxSolid;
use crate::units::{cm, um};
use crate::volume::{ScoringVolumes, Volume};

// foiltools modules
use foiltools_format::f;

// external crates
use log::{debug, info};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Dimensions and materials of the target
///
/// Defaults reproduce the production target. Any field missing from a JSON
/// file keeps its default.
///
/// ```rust
/// # use foiltools_geometry::DetectorConfig;
/// let config = DetectorConfig::from_json(r#"{ "ta_bins": 4 }"#).unwrap();
/// assert_eq!(config.ta_bins, 4);
/// assert_eq!(config.al_thickness_um, 15.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Full envelope size in x and y (cm)
    pub env_size_xy_cm: f64,
    /// Full envelope size in z (cm)
    pub env_size_z_cm: f64,
    /// World size as a multiple of the envelope size
    pub world_factor: f64,
    /// Half-width of both foils in x and y (cm)
    pub foil_half_xy_cm: f64,
    /// Thickness of the aluminium slot foil (um)
    pub al_thickness_um: f64,
    /// Number of slabs the aluminium slot foil is split into
    pub al_bins: u32,
    /// Thickness of the tantalum foil (um)
    pub ta_thickness_um: f64,
    /// Number of slabs the tantalum foil is split into
    pub ta_bins: u32,
    /// Offset from the aluminium foil face to the tantalum foil centre line (um)
    pub foil_gap_um: f64,
    /// Material of the world
    pub world_material: String,
    /// Material of the envelope
    pub env_material: String,
    /// Material of the aluminium slot foil
    pub al_material: String,
    /// Material of the tantalum foil
    pub ta_material: String,
    /// Check every placement for overlaps with its mother and siblings
    pub check_overlaps: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            env_size_xy_cm: 200.0,
            env_size_z_cm: 300.0,
            world_factor: 12.0,
            foil_half_xy_cm: 6.0,
            al_thickness_um: 15.0,
            al_bins: 1,
            ta_thickness_um: 100.0,
            ta_bins: 1,
            foil_gap_um: 10000.0,
            world_material: INTER_GALACTIC.to_string(),
            env_material: INTER_GALACTIC.to_string(),
            al_material: INTER_GALACTIC.to_string(),
            ta_material: "G4_Ta".to_string(),
            check_overlaps: true,
        }
    }
}

impl DetectorConfig {
    /// Read a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::io::BufReader::new(std::fs::File::open(path)?);
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that can not describe a physical target
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("env_size_xy_cm", self.env_size_xy_cm),
            ("env_size_z_cm", self.env_size_z_cm),
            ("foil_half_xy_cm", self.foil_half_xy_cm),
            ("al_thickness_um", self.al_thickness_um),
            ("ta_thickness_um", self.ta_thickness_um),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(f!("{name} must be positive, found {value}")));
            }
        }

        if !self.foil_gap_um.is_finite() || self.foil_gap_um < 0.0 {
            return Err(Error::InvalidConfig(f!(
                "foil_gap_um must not be negative, found {}",
                self.foil_gap_um
            )));
        }

        if self.world_factor.is_nan() || self.world_factor <= 1.0 {
            return Err(Error::InvalidConfig(f!(
                "world_factor must be greater than 1, found {}",
                self.world_factor
            )));
        }

        if self.al_bins == 0 || self.ta_bins == 0 {
            return Err(Error::InvalidConfig("foils need at least one bin".to_string()));
        }

        Ok(())
    }

    /// Centre of every aluminium slab along z, in internal units
    pub fn al_slab_positions(&self) -> Vec<f64> {
        let binlen = self.al_thickness_um / self.al_bins as f64;
        (0..self.al_bins)
            .map(|i| -(self.al_thickness_um / 2.0 - binlen / 2.0 - i as f64 * binlen) * um)
            .collect()
    }

    /// Centre of every tantalum slab along z, in internal units
    pub fn ta_slab_positions(&self) -> Vec<f64> {
        let binlen = self.ta_thickness_um / self.ta_bins as f64;
        let centre = self.al_thickness_um / 2.0 + self.foil_gap_um;
        (0..self.ta_bins)
            .map(|j| {
                (centre - (self.ta_thickness_um / 2.0 - binlen / 2.0 - j as f64 * binlen)) * um
            })
            .collect()
    }
}

/// The constructed target
///
/// Holds the full volume tree and the handles needed to classify steps.
#[derive(Debug, Clone)]
pub struct Detector {
    /// Volume hierarchy
    pub geometry: Geometry,
    /// Handles of the classification volumes
    pub scoring: ScoringVolumes,
}

impl Detector {
    /// Build the default target
    pub fn build_default() -> Result<Self> {
        DetectorConstruction::default().construct()
    }

    /// Top level placement
    pub fn world(&self) -> Result<PhysicalId> {
        self.geometry
            .world()
            .ok_or_else(|| Error::InvalidPlacement("no world has been placed".to_string()))
    }

    /// Scoring volume containing a point given in world coordinates
    ///
    /// ```rust
    /// # use foiltools_geometry::{Detector, Volume};
    /// # use foiltools_geometry::units::um;
    /// # use nalgebra::Vector3;
    /// let detector = Detector::build_default().unwrap();
    /// let inside_al = Vector3::new(0.0, 0.0, 5.0 * um);
    /// assert_eq!(detector.classify_point(&inside_al), Volume::FoilAl);
    /// ```
    pub fn classify_point(&self, point: &Vector3<f64>) -> Volume {
        let logical = self
            .geometry
            .locate(point)
            .and_then(|id| self.geometry.logical_of(id));
        self.scoring.classify(logical)
    }
}

/// Builds a [Detector] from a [DetectorConfig]
#[derive(Debug, Clone, Default)]
pub struct DetectorConstruction {
    config: DetectorConfig,
}

impl DetectorConstruction {
    /// Construction for a specific configuration
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Configuration used for construction
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Build the volume tree and collect the scoring handles
    ///
    /// Called once, before any step is recorded.
    pub fn construct(&self) -> Result<Detector> {
        let config = &self.config;
        config.validate()?;

        let mut geometry = Geometry::new(config.check_overlaps);

        // World
        let env_xy = config.env_size_xy_cm * cm;
        let env_z = config.env_size_z_cm * cm;
        let world_xy = config.world_factor * env_xy;
        let world_z = config.world_factor * env_z;

        let world_solid = BoxSolid::new("World", 0.5 * world_xy, 0.5 * world_xy, 0.5 * world_z)?;
        let logic_world = geometry.add_logical(LogicalVolume::new(
            "World",
            world_solid,
            Material::by_name(&config.world_material)?,
        ));
        let phys_world = geometry.place_world("World", logic_world)?;

        // Envelope
        let env_solid = BoxSolid::new("Envelope", 0.5 * env_xy, 0.5 * env_xy, 0.5 * env_z)?;
        let logic_env = geometry.add_logical(LogicalVolume::new(
            "Envelope",
            env_solid,
            Material::by_name(&config.env_material)?,
        ));
        let phys_env = geometry.place("Envelope", logic_env, phys_world, Vector3::zeros(), 0)?;

        // Aluminium slot foil, one shared logical volume for every slab
        let foil_xy = config.foil_half_xy_cm * cm;
        let al_half_z = 0.5 * config.al_thickness_um / config.al_bins as f64 * um;
        let logic_al = geometry.add_logical(LogicalVolume::new(
            "foilAl_log",
            BoxSolid::new("foilAl", foil_xy, foil_xy, al_half_z)?,
            Material::by_name(&config.al_material)?,
        ));
        for (i, z) in config.al_slab_positions().into_iter().enumerate() {
            geometry.place(
                "foilAl_phy",
                logic_al,
                phys_env,
                Vector3::new(0.0, 0.0, z),
                i as i32,
            )?;
        }

        // Tantalum foil
        let ta_half_z = 0.5 * config.ta_thickness_um / config.ta_bins as f64 * um;
        let logic_ta = geometry.add_logical(LogicalVolume::new(
            "foilTa_log",
            BoxSolid::new("foilTa", foil_xy, foil_xy, ta_half_z)?,
            Material::by_name(&config.ta_material)?,
        ));
        for (j, z) in config.ta_slab_positions().into_iter().enumerate() {
            geometry.place(
                "foilTa_phy",
                logic_ta,
                phys_env,
                Vector3::new(0.0, 0.0, z),
                j as i32,
            )?;
        }

        debug!("constructed geometry:\n{geometry}");
        info!(
            "target built with {} placements ({} Al slabs, {} Ta slabs)",
            geometry.number_of_placements(),
            config.al_bins,
            config.ta_bins
        );

        Ok(Detector {
            geometry,
            scoring: ScoringVolumes {
                envelope: logic_env,
                foil_al: logic_al,
                foil_ta: logic_ta,
            },
        })
    }
}
