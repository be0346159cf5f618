//! Record a toy run through the default target and summarise the output
//!
//! Beam protons travel straight down the z axis from in front of the
//! aluminium foil to beyond the tantalum foil. Each event is split into fixed
//! length steps, the deposit is a fixed stopping power times the step length
//! in the two foils, and every step is recorded. The run is then read back
//! from disk and summarised.
//!
//! ```bash
//! cargo run --example summarise_run -- ./output --events 120000 -vv
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use foiltools::geometry::units::{keV, mm, ns, um, MeV};
use foiltools::geometry::{DetectorConfig, DetectorConstruction, Volume};
use foiltools::recorder::{RecorderConfig, Step, StepRecorder};
use foiltools::stepdat::{read_paths, write_ascii_pretty, write_json, RunSummary};
use log::info;
use nalgebra::Vector3;

#[derive(Parser, Debug)]
#[command(about = "Record a toy proton run through the foil target and summarise it")]
struct Cli {
    /// Output directory for the step data files
    #[arg(default_value = "./output")]
    output: PathBuf,

    /// Number of events to simulate
    #[arg(long, default_value_t = 200)]
    events: i32,

    /// Beam kinetic energy (MeV)
    #[arg(long, default_value_t = 5.0)]
    energy: f64,

    /// Target configuration as JSON
    #[arg(long)]
    target: Option<PathBuf>,

    /// Verbosity (-v, -vv, ...)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Stopping power in the foils, per unit length
const DEPOSIT_PER_UM: f64 = 0.05 * keV;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    stderrlog::new()
        .module(module_path!())
        .module("foiltools_geometry")
        .module("foiltools_recorder")
        .module("foiltools_stepdat")
        .verbosity(cli.verbose as usize + 1)
        .init()?;

    let config = match &cli.target {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    let detector = DetectorConstruction::new(config).construct()?;
    info!("target built with {} placements", detector.geometry.number_of_placements());

    let recorder_config = RecorderConfig::in_directory(&cli.output);
    let mut recorder = StepRecorder::new(detector.scoring, recorder_config)?;

    // from 1 mm in front of the aluminium to 1 mm beyond the tantalum
    let start = -1.0 * mm;
    let end = 11.2 * mm;
    let step_length = 50.0 * um;
    let n_steps = ((end - start) / step_length).round() as usize;
    let mass = 938.272 * MeV;

    for event_id in 0..cli.events {
        let mut kinetic_energy = cli.energy * MeV;
        let mut time = 0.0;

        for i in 0..n_steps {
            let pre = Vector3::new(0.0, 0.0, start + i as f64 * step_length);
            let post = pre + Vector3::new(0.0, 0.0, step_length);

            let volume = detector
                .geometry
                .locate(&pre)
                .and_then(|p| detector.geometry.logical_of(p));

            let edep = match detector.scoring.classify(volume) {
                Volume::FoilAl | Volume::FoilTa => DEPOSIT_PER_UM * step_length / um,
                _ => 0.0,
            };
            kinetic_energy = (kinetic_energy - edep).max(0.0);

            let momentum = (kinetic_energy * (kinetic_energy + 2.0 * mass)).sqrt();
            let beta = momentum / (kinetic_energy + mass);
            time += step_length / (beta * 299.792458 * mm / ns);

            let mut step = Step::new(event_id, "proton")
                .with_edep(edep)
                .with_kinetic_energy(kinetic_energy)
                .with_time(time)
                .with_step_length(step_length)
                .with_momentum([0.0, 0.0, momentum])
                .with_position([post.x, post.y, post.z]);
            step.volume = volume;

            recorder.record_step(&step)?;
        }
    }

    let tally = recorder.finish_run();
    recorder.close()?;
    info!("{tally}");

    let records = read_paths(recorder.paths())?;
    let summary = RunSummary::from_records(&records);
    println!("{summary}");

    write_json(&summary, cli.output.join("summary.json"))?;
    write_ascii_pretty(&summary, cli.output.join("summary.txt"))?;
    Ok(())
}
