//! Per-step recording into rotating step data files

// standard library
use std::path::PathBuf;

// crate modules
use crate::config::RecorderConfig;
use crate::context::StepContext;
use crate::error::{Error, Result};
use crate::tally::{EventTally, RunTally};

// foiltools modules
use foiltools_geometry::units::{keV, ns, um};
use foiltools_geometry::{ScoringVolumes, Volume};
use foiltools_stepdat::{RotatingWriter, StepRecord};

// external crates
use log::{debug, info, warn};

/// Records every step it is given as one row of step data
///
/// Classification uses the scoring volume handles produced when the target
/// was constructed. A recorder may be created before those exist with
/// [StepRecorder::unresolved()] and bound later with [StepRecorder::bind()].
/// Until then steps are classified as [Volume::World], or rejected if
/// `strict_volumes` is set.
///
/// The first output file is opened as soon as the recorder is created.
///
/// ```rust
/// # use foiltools_recorder::{RecorderConfig, Step, StepRecorder};
/// # use foiltools_geometry::{Detector, Volume};
/// # use foiltools_geometry::units::{keV, um};
/// let dir = std::env::temp_dir().join("foiltools_recorder_doc");
/// let detector = Detector::build_default().unwrap();
///
/// let config = RecorderConfig::in_directory(&dir);
/// let mut recorder = StepRecorder::new(detector.scoring, config).unwrap();
///
/// let step = Step::new(0, "proton")
///     .with_volume(detector.scoring.foil_al)
///     .with_edep(3.0 * keV)
///     .with_position([0.0, 0.0, 5.0 * um]);
///
/// let record = recorder.record_step(&step).unwrap();
/// assert_eq!(record.volume, Volume::FoilAl);
/// assert!((record.edep_kev - 3.0).abs() < 1e-9);
///
/// recorder.close().unwrap();
/// ```
#[derive(Debug)]
pub struct StepRecorder {
    scoring: Option<ScoringVolumes>,
    writer: RotatingWriter,
    strict_volumes: bool,
    warned_unresolved: bool,
    tally: EventTally,
    steps: u64,
}

impl StepRecorder {
    /// Recorder with the scoring handles already known
    pub fn new(scoring: ScoringVolumes, config: RecorderConfig) -> Result<Self> {
        let mut recorder = Self::unresolved(config)?;
        recorder.bind(scoring);
        Ok(recorder)
    }

    /// Recorder with no scoring handles yet
    pub fn unresolved(config: RecorderConfig) -> Result<Self> {
        let writer = RotatingWriter::create(&config.output_dir, config.writer)?;
        debug!("recording steps to {:?}", config.output_dir);

        Ok(Self {
            scoring: None,
            writer,
            strict_volumes: config.strict_volumes,
            warned_unresolved: false,
            tally: EventTally::default(),
            steps: 0,
        })
    }

    /// Set the scoring handles used for every following step
    pub fn bind(&mut self, scoring: ScoringVolumes) {
        debug!("scoring volumes bound: {scoring:?}");
        self.scoring = Some(scoring);
    }

    /// Are the scoring handles known
    pub fn is_bound(&self) -> bool {
        self.scoring.is_some()
    }

    /// Classify, convert and write a single step
    ///
    /// The converted record is returned as well as written. A change of event
    /// identifier starts a new event in the energy tally. Only steps that
    /// reached the file are tallied.
    pub fn record_step<S: StepContext + ?Sized>(&mut self, step: &S) -> Result<StepRecord> {
        let event_id = step.event_id();
        let volume = self.classify(step)?;

        let edep_kev = step.total_energy_deposit() / keV;
        let position = step.post_step_position() / um;
        let record = StepRecord {
            event_id,
            particle: step.particle_name().to_string(),
            volume,
            edep_kev,
            kinetic_energy_kev: step.kinetic_energy() / keV,
            global_time_ns: step.global_time() / ns,
            step_length_um: step.step_length() / um,
            momentum_kev: step.momentum().norm() / keV,
            position_um: [position.x, position.y, position.z],
        };

        self.writer.append(&record)?;
        self.steps += 1;

        if self.tally.current_event() != Some(event_id) {
            self.tally.begin_event(event_id);
        }
        self.tally.add_edep(edep_kev);
        Ok(record)
    }

    /// Scoring volume the step started in
    fn classify<S: StepContext + ?Sized>(&mut self, step: &S) -> Result<Volume> {
        match self.scoring {
            Some(scoring) => Ok(scoring.classify(step.pre_step_volume())),
            None if self.strict_volumes => Err(Error::VolumeResolution {
                event_id: step.event_id(),
            }),
            None => {
                if !self.warned_unresolved {
                    warn!("scoring volumes are not bound, steps are recorded as World");
                    self.warned_unresolved = true;
                }
                Ok(Volume::World)
            }
        }
    }

    /// Close the open event and return the run statistics
    ///
    /// The tally starts afresh, the output file stays open.
    pub fn finish_run(&mut self) -> RunTally {
        let run = self.tally.finish_run();
        info!("run finished: {run}");
        run
    }

    /// Flush and close the active output file
    pub fn close(&mut self) -> Result<()> {
        self.writer.close()?;
        info!(
            "recorded {} steps to {} file(s)",
            self.steps,
            self.writer.paths().len()
        );
        Ok(())
    }

    /// Number of steps written so far
    pub fn steps_recorded(&self) -> u64 {
        self.steps
    }

    /// Every output file opened so far, in order
    pub fn paths(&self) -> &[PathBuf] {
        self.writer.paths()
    }

    /// Energy tally of the current run
    pub fn tally(&self) -> &EventTally {
        &self.tally
    }
}
