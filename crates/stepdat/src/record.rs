//! Data for a single transport step

// foiltools modules
use foiltools_format::NumFormat;
use foiltools_geometry::Volume;

// external crates
use serde::{Deserialize, Serialize};

/// One row of a step data file
///
/// Every quantity is already converted to output units, as given in the
/// field names. The transport engine works in its own internal units and the
/// conversion happens once, when the step is recorded.
///
/// | Column            | Field                | Type   | Unit |
/// | ----------------- | -------------------- | ------ | ---- |
/// | `EventID`         | `event_id`           | `I`    |      |
/// | `particle`        | `particle`           | `C`    |      |
/// | `volumeName`      | `volume`             | `I`    |      |
/// | `edepStep_keV`    | `edep_kev`           | `D`    | keV  |
/// | `KEparticle_keV`  | `kinetic_energy_kev` | `D`    | keV  |
/// | `global_t_ns`     | `global_time_ns`     | `D`    | ns   |
/// | `steplen_um`      | `step_length_um`     | `D`    | um   |
/// | `momentum_keV`    | `momentum_kev`       | `D`    | keV  |
/// | `globalx_um` etc. | `position_um`        | `D`    | um   |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Identifier of the event the step belongs to
    pub event_id: i32,
    /// Particle name as given by the transport engine, e.g. `proton`, `e-`
    pub particle: String,
    /// Scoring volume the step started in
    pub volume: Volume,
    /// Energy deposited along the step (keV)
    pub edep_kev: f64,
    /// Kinetic energy of the track after the step (keV)
    pub kinetic_energy_kev: f64,
    /// Time since the start of the event (ns)
    pub global_time_ns: f64,
    /// Length of the step (um)
    pub step_length_um: f64,
    /// Magnitude of the track momentum (keV)
    pub momentum_kev: f64,
    /// Post-step position in world coordinates (um)
    pub position_um: [f64; 3],
}

impl std::fmt::Display for StepRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "StepRecord")?;
        writeln!(f, "   Event            {}", self.event_id)?;
        writeln!(f, "   Particle         {}", self.particle)?;
        writeln!(f, "   Volume           {} ({})", self.volume, self.volume.code())?;
        writeln!(f, "   Energy deposit   {} keV", self.edep_kev.general(6))?;
        writeln!(f, "   Kinetic energy   {} keV", self.kinetic_energy_kev.general(6))?;
        writeln!(f, "   Global time      {} ns", self.global_time_ns.general(6))?;
        writeln!(f, "   Step length      {} um", self.step_length_um.general(6))?;
        writeln!(f, "   Momentum         {} keV", self.momentum_kev.general(6))?;
        write!(
            f,
            "   Position         ({}, {}, {}) um",
            self.position_um[0].general(6),
            self.position_um[1].general(6),
            self.position_um[2].general(6)
        )
    }
}
