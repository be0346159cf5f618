//! Run level summaries of step data

// standard library
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::record::StepRecord;

// foiltools modules
use foiltools_format::{f, NumFormat};
use foiltools_geometry::Volume;

// external crates
use serde::{Deserialize, Serialize};

/// Step count and deposited energy within one volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
    /// Number of steps that started in the volume
    pub steps: u64,
    /// Total deposited energy (keV)
    pub edep_kev: f64,
}

/// Overview of a collection of step records
///
/// Every volume appears in `volumes`, even when no steps were recorded in it.
///
/// ```rust
/// # use foiltools_stepdat::{RunSummary, StepRecord};
/// # use foiltools_geometry::Volume;
/// let records = vec![
///     StepRecord { event_id: 4, volume: Volume::FoilTa, edep_kev: 2.0, ..Default::default() },
///     StepRecord { event_id: 9, volume: Volume::FoilTa, edep_kev: 1.0, ..Default::default() },
/// ];
///
/// let summary = RunSummary::from_records(&records);
/// assert_eq!(summary.events, 2);
/// assert_eq!(summary.volumes[&Volume::FoilTa].steps, 2);
/// assert_eq!(summary.volumes[&Volume::World].steps, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total number of steps
    pub steps: u64,
    /// Number of distinct event identifiers
    pub events: u64,
    /// Lowest event identifier seen
    pub first_event: Option<i32>,
    /// Highest event identifier seen
    pub last_event: Option<i32>,
    /// Total deposited energy (keV)
    pub edep_kev: f64,
    /// Mean deposited energy per event (keV)
    pub mean_event_edep_kev: f64,
    /// Breakdown by scoring volume
    pub volumes: BTreeMap<Volume, VolumeSummary>,
    /// Step counts by particle name
    pub particles: BTreeMap<String, u64>,
}

impl RunSummary {
    /// Collect a summary from records in any order
    pub fn from_records(records: &[StepRecord]) -> Self {
        let mut summary = Self {
            volumes: Volume::ALL
                .iter()
                .map(|v| (*v, VolumeSummary::default()))
                .collect(),
            ..Default::default()
        };

        let mut events: BTreeMap<i32, f64> = BTreeMap::new();

        for record in records {
            summary.steps += 1;
            summary.edep_kev += record.edep_kev;

            let volume = summary.volumes.entry(record.volume).or_default();
            volume.steps += 1;
            volume.edep_kev += record.edep_kev;

            *summary.particles.entry(record.particle.clone()).or_default() += 1;
            *events.entry(record.event_id).or_default() += record.edep_kev;
        }

        summary.events = events.len() as u64;
        summary.first_event = events.keys().next().copied();
        summary.last_event = events.keys().next_back().copied();
        if !events.is_empty() {
            summary.mean_event_edep_kev = summary.edep_kev / events.len() as f64;
        }

        summary
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let range = match (self.first_event, self.last_event) {
            (Some(first), Some(last)) => f!("{first} - {last}"),
            _ => "none".to_string(),
        };

        writeln!(f, "Run summary")?;
        writeln!(f, "   Steps            {}", self.steps)?;
        writeln!(f, "   Events           {}", self.events)?;
        writeln!(f, "   Event range      {range}")?;
        writeln!(f, "   Total edep       {} keV", self.edep_kev.sci(5, 2))?;
        writeln!(f, "   Mean event edep  {} keV", self.mean_event_edep_kev.sci(5, 2))?;
        for (volume, s) in &self.volumes {
            writeln!(
                f,
                "   {:<16} {:>10} steps  {} keV",
                volume.name(),
                s.steps,
                s.edep_kev.sci(5, 2)
            )?;
        }
        write!(f, "   Particles        {}", self.particles.len())
    }
}

/// Write a [RunSummary] to a JSON file
///
/// Direct serialisation of every field, volumes are keyed by name.
///
/// ```rust, no_run
/// # use foiltools_stepdat::{read_run, write_json, RunSummary, WriterConfig};
/// let records = read_run("./output", &WriterConfig::default()).unwrap();
/// let summary = RunSummary::from_records(&records);
/// write_json(&summary, "./summary.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(summary: &RunSummary, path: P) -> Result<()> {
    let writer = init_writer(path)?;
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Write a [RunSummary] to a human readable text file
///
/// The overview is followed by the per-volume table and a wrapped list of
/// particle step counts.
///
/// ```rust, no_run
/// # use foiltools_stepdat::{read_run, write_ascii_pretty, RunSummary, WriterConfig};
/// let records = read_run("./output", &WriterConfig::default()).unwrap();
/// let summary = RunSummary::from_records(&records);
/// write_ascii_pretty(&summary, "./summary.txt").unwrap();
/// ```
pub fn write_ascii_pretty<P: AsRef<Path>>(summary: &RunSummary, path: P) -> Result<()> {
    let mut writer = init_writer(path)?;

    writeln!(writer, "Total steps : {}", summary.steps)?;
    writeln!(writer, "Total events: {}", summary.events)?;
    if let (Some(first), Some(last)) = (summary.first_event, summary.last_event) {
        writeln!(writer, "Event range : {first} - {last}")?;
    }
    writeln!(writer, "Total edep  : {} keV", summary.edep_kev.sci(5, 2))?;
    writeln!(writer, "Mean edep   : {} keV/event", summary.mean_event_edep_kev.sci(5, 2))?;

    writeln!(writer, "\n{:>4} {:<10} {:>12} {:>14}", "code", "volume", "steps", "edep (keV)")?;
    for (volume, s) in &summary.volumes {
        writeln!(
            writer,
            "{:>4} {:<10} {:>12} {:>14}",
            volume.code(),
            volume.name(),
            s.steps,
            s.edep_kev.sci(5, 2)
        )?;
    }

    let particles = summary
        .particles
        .iter()
        .map(|(name, steps)| f!("{name}:{steps}"))
        .collect::<Vec<String>>()
        .join(" ");

    writeln!(writer, "\nParticle steps:")?;
    writeln!(writer, "{}", textwrap::fill(&particles, 80))?;
    writer.flush()?;

    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event_id: i32, particle: &str, volume: Volume, edep_kev: f64) -> StepRecord {
        StepRecord {
            event_id,
            particle: particle.to_string(),
            volume,
            edep_kev,
            ..Default::default()
        }
    }

    #[test]
    fn empty_run() {
        let summary = RunSummary::from_records(&[]);
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.first_event, None);
        assert_eq!(summary.volumes.len(), 4);
        assert_eq!(summary.mean_event_edep_kev, 0.0);
    }

    #[test]
    fn breakdown() {
        let records = [
            record(7, "e-", Volume::FoilAl, 1.0),
            record(3, "e-", Volume::FoilTa, 2.0),
            record(3, "gamma", Volume::Envelope, 0.0),
            record(7, "proton", Volume::FoilAl, 5.0),
        ];
        let summary = RunSummary::from_records(&records);

        assert_eq!(summary.steps, 4);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.first_event, Some(3));
        assert_eq!(summary.last_event, Some(7));
        assert_eq!(summary.edep_kev, 8.0);
        assert_eq!(summary.mean_event_edep_kev, 4.0);
        assert_eq!(summary.volumes[&Volume::FoilAl].steps, 2);
        assert_eq!(summary.volumes[&Volume::FoilAl].edep_kev, 6.0);
        assert_eq!(summary.particles["e-"], 2);
        assert_eq!(summary.particles["gamma"], 1);
    }
}
