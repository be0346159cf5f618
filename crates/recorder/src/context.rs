//! Step context seam to the transport engine

// foiltools modules
use foiltools_geometry::LogicalId;

// external crates
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Read-only view of one completed transport step
///
/// Implemented by whatever drives the transport. Every quantity is in the
/// engine's internal units (mm, ns, MeV), see
/// [units](foiltools_geometry::units).
pub trait StepContext {
    /// Identifier of the event being simulated
    fn event_id(&self) -> i32;

    /// Identifier of the track within its event
    fn track_id(&self) -> i32;

    /// Particle name, e.g. `proton`, `e-`, `gamma`
    fn particle_name(&self) -> &str;

    /// Logical volume at the start of the step, `None` if unknown
    fn pre_step_volume(&self) -> Option<LogicalId>;

    /// Total energy deposited along the step
    fn total_energy_deposit(&self) -> f64;

    /// Kinetic energy of the track
    fn kinetic_energy(&self) -> f64;

    /// Time since the start of the event
    fn global_time(&self) -> f64;

    /// Length of the step
    fn step_length(&self) -> f64;

    /// Momentum of the track
    fn momentum(&self) -> Vector3<f64>;

    /// Position at the end of the step, in world coordinates
    fn post_step_position(&self) -> Vector3<f64>;
}

/// Plain data step
///
/// For engines that hand steps across a boundary by value, and for testing.
/// Built up from [Step::new()] with the `with_*` methods.
///
/// ```rust
/// # use foiltools_recorder::{Step, StepContext};
/// # use foiltools_geometry::units::{keV, um};
/// let step = Step::new(7, "proton")
///     .with_edep(12.0 * keV)
///     .with_position([0.0, 0.0, 3.0 * um]);
///
/// assert_eq!(step.event_id(), 7);
/// assert_eq!(step.particle_name(), "proton");
/// assert!(step.pre_step_volume().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Event identifier
    pub event_id: i32,
    /// Track identifier within the event
    pub track_id: i32,
    /// Particle name
    pub particle: String,
    /// Logical volume at the start of the step
    pub volume: Option<LogicalId>,
    /// Total energy deposit (MeV)
    pub edep: f64,
    /// Kinetic energy of the track (MeV)
    pub kinetic_energy: f64,
    /// Time since the start of the event (ns)
    pub global_time: f64,
    /// Step length (mm)
    pub step_length: f64,
    /// Track momentum (MeV)
    pub momentum: Vector3<f64>,
    /// Post-step position in world coordinates (mm)
    pub position: Vector3<f64>,
}

impl Step {
    /// New step with every quantity zero and no volume
    pub fn new(event_id: i32, particle: impl Into<String>) -> Self {
        Self {
            event_id,
            track_id: 1,
            particle: particle.into(),
            ..Default::default()
        }
    }

    /// Set the track identifier
    pub fn with_track(mut self, track_id: i32) -> Self {
        self.track_id = track_id;
        self
    }

    /// Set the pre-step logical volume
    pub fn with_volume(mut self, volume: LogicalId) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Set the energy deposit
    pub fn with_edep(mut self, edep: f64) -> Self {
        self.edep = edep;
        self
    }

    /// Set the kinetic energy
    pub fn with_kinetic_energy(mut self, kinetic_energy: f64) -> Self {
        self.kinetic_energy = kinetic_energy;
        self
    }

    /// Set the global time
    pub fn with_time(mut self, global_time: f64) -> Self {
        self.global_time = global_time;
        self
    }

    /// Set the step length
    pub fn with_step_length(mut self, step_length: f64) -> Self {
        self.step_length = step_length;
        self
    }

    /// Set the momentum vector
    pub fn with_momentum(mut self, momentum: [f64; 3]) -> Self {
        self.momentum = Vector3::from(momentum);
        self
    }

    /// Set the post-step position
    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.position = Vector3::from(position);
        self
    }
}

impl StepContext for Step {
    fn event_id(&self) -> i32 {
        self.event_id
    }

    fn track_id(&self) -> i32 {
        self.track_id
    }

    fn particle_name(&self) -> &str {
        &self.particle
    }

    fn pre_step_volume(&self) -> Option<LogicalId> {
        self.volume
    }

    fn total_energy_deposit(&self) -> f64 {
        self.edep
    }

    fn kinetic_energy(&self) -> f64 {
        self.kinetic_energy
    }

    fn global_time(&self) -> f64 {
        self.global_time
    }

    fn step_length(&self) -> f64 {
        self.step_length
    }

    fn momentum(&self) -> Vector3<f64> {
        self.momentum
    }

    fn post_step_position(&self) -> Vector3<f64> {
        self.position
    }
}
