//! Write operations for step data files
//!
//! Files are rotated so that no single file grows without bound. The rule
//! is tied to event identifiers rather than file size: once the current event
//! is more than `events_per_file` away from the event that opened the file,
//! the file is closed and the next one in the sequence is started.

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};
use crate::record::StepRecord;
use crate::schema::{header_line, COLUMNS};

// foiltools modules
use foiltools_format::{f, NumFormat};

// external crates
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Naming, rotation and precision settings for step data files
///
/// ```rust
/// # use foiltools_stepdat::WriterConfig;
/// let config = WriterConfig::default();
/// assert_eq!(config.file_name(3), "run_3.dat");
/// assert_eq!(config.events_per_file, 50_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// File name prefix, followed by the sequence number
    pub prefix: String,
    /// File extension, without the dot
    pub extension: String,
    /// Rotation threshold on the event identifier
    pub events_per_file: u64,
    /// Significant digits for floating point columns
    pub precision: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            prefix: "run_".to_string(),
            extension: "dat".to_string(),
            events_per_file: 50_000,
            precision: 6,
        }
    }
}

impl WriterConfig {
    /// File name for a sequence number
    pub fn file_name(&self, index: usize) -> String {
        f!("{}{}.{}", self.prefix, index, self.extension)
    }

    /// Rotation policy implied by the config
    pub fn policy(&self) -> RotationPolicy {
        RotationPolicy::new(self.events_per_file)
    }
}

/// Decides when a step data file is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum distance between an event and the baseline before rotating
    pub events_per_file: u64,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::new(50_000)
    }
}

impl RotationPolicy {
    /// Policy for a given threshold
    pub fn new(events_per_file: u64) -> Self {
        Self { events_per_file }
    }

    /// Should a file opened at `baseline` be closed before writing `event_id`
    ///
    /// The distance is absolute, so a jump backwards rotates as well.
    ///
    /// ```rust
    /// # use foiltools_stepdat::RotationPolicy;
    /// let policy = RotationPolicy::default();
    /// assert!(!policy.should_rotate(0, 50_000));
    /// assert!(policy.should_rotate(0, 50_001));
    /// assert!(policy.should_rotate(60_000, 9_999));
    /// ```
    pub fn should_rotate(&self, baseline: i32, event_id: i32) -> bool {
        (event_id as i64 - baseline as i64).unsigned_abs() > self.events_per_file
    }
}

/// Format a record as one data row, without the newline
///
/// Each field is written as a space, the value right-aligned to the column
/// width, and another space. Floating point values use general notation with
/// `precision` significant digits.
///
/// ```rust
/// # use foiltools_stepdat::{format_row, StepRecord};
/// # use foiltools_geometry::Volume;
/// let record = StepRecord {
///     event_id: 12,
///     particle: "proton".to_string(),
///     volume: Volume::FoilAl,
///     edep_kev: 1.5,
///     ..Default::default()
/// };
/// let row = format_row(&record, 6);
/// assert!(row.starts_with("    12      proton           1         1.5 "));
/// ```
pub fn format_row(record: &StepRecord, precision: usize) -> String {
    let floats = [
        record.edep_kev,
        record.kinetic_energy_kev,
        record.global_time_ns,
        record.step_length_um,
        record.momentum_kev,
        record.position_um[0],
        record.position_um[1],
        record.position_um[2],
    ];

    let fields = [
        record.event_id.to_string(),
        record.particle.clone(),
        record.volume.code().to_string(),
    ]
    .into_iter()
    .chain(floats.iter().map(|v| v.general(precision)));

    fields
        .zip(COLUMNS.iter())
        .map(|(field, column)| f!(" {:>width$} ", field, width = column.row_width))
        .collect()
}

/// Rows are split on whitespace when read back
fn check_particle(particle: &str) -> Result<()> {
    if particle.is_empty() || particle.contains(char::is_whitespace) {
        return Err(Error::InvalidParticleName(particle.to_string()));
    }
    Ok(())
}

/// Owns the active step data file and rotates it
///
/// Starts with `<prefix>0.<extension>` open and a baseline of event 0. Files
/// left over from an earlier run in the same directory are removed, so the
/// sequence on disk always belongs to a single run. The active file is flushed
/// and closed by [RotatingWriter::close()], or when the writer is dropped.
///
/// ```rust, no_run
/// # use foiltools_stepdat::{RotatingWriter, StepRecord, WriterConfig};
/// let mut writer = RotatingWriter::create("./output", WriterConfig::default()).unwrap();
///
/// let record = StepRecord {
///     particle: "e-".to_string(),
///     ..Default::default()
/// };
/// writer.append(&record).unwrap();
///
/// writer.close().unwrap();
/// ```
#[derive(Debug)]
pub struct RotatingWriter {
    directory: PathBuf,
    config: WriterConfig,
    policy: RotationPolicy,
    baseline: i32,
    next_index: usize,
    writer: Option<BufWriter<File>>,
    paths: Vec<PathBuf>,
}

impl RotatingWriter {
    /// Create the output directory if needed and open the first file
    ///
    /// Any `<prefix>1.<extension>`, `<prefix>2.<extension>`, ... already in
    /// the directory is deleted, up to the first missing index.
    pub fn create<P: AsRef<Path>>(directory: P, config: WriterConfig) -> Result<Self> {
        std::fs::create_dir_all(directory.as_ref())?;

        for stale in (1..)
            .map(|i| directory.as_ref().join(config.file_name(i)))
            .take_while(|path| path.is_file())
        {
            debug!("removing {stale:?} left by an earlier run");
            std::fs::remove_file(&stale)?;
        }

        let mut writer = Self {
            directory: directory.as_ref().to_path_buf(),
            policy: config.policy(),
            config,
            baseline: 0,
            next_index: 0,
            writer: None,
            paths: Vec::new(),
        };
        writer.open_next()?;
        Ok(writer)
    }

    /// Rotate if `event_id` is too far from the baseline
    ///
    /// Returns `true` when a new file was started, in which case the baseline
    /// moves to `event_id`. A closed writer never reopens.
    pub fn observe_event(&mut self, event_id: i32) -> Result<bool> {
        if !self.is_open() {
            return Err(Error::WriterClosed);
        }
        if !self.policy.should_rotate(self.baseline, event_id) {
            return Ok(false);
        }

        debug!(
            "event {event_id} is more than {} events past {}, rotating",
            self.policy.events_per_file, self.baseline
        );
        self.close()?;
        self.open_next()?;
        self.baseline = event_id;
        Ok(true)
    }

    /// Write one record to the active file
    ///
    /// The particle name must be a single non-empty token, or the row could
    /// not be read back.
    pub fn write_record(&mut self, record: &StepRecord) -> Result<()> {
        check_particle(&record.particle)?;
        let row = format_row(record, self.config.precision);
        let writer = self.writer.as_mut().ok_or(Error::WriterClosed)?;
        writeln!(writer, "{row}")?;
        trace!("{row}");
        Ok(())
    }

    /// Rotate if needed, then write the record
    ///
    /// Returns `true` if the record started a new file.
    pub fn append(&mut self, record: &StepRecord) -> Result<bool> {
        check_particle(&record.particle)?;
        let rotated = self.observe_event(record.event_id)?;
        self.write_record(record)?;
        Ok(rotated)
    }

    /// Flush and close the active file
    ///
    /// Closing twice is harmless. Writing after closing is an error.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!("closed {:?}", self.paths.last());
        }
        Ok(())
    }

    /// Is a file currently open
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Path of the most recently opened file
    pub fn current_path(&self) -> Option<&Path> {
        self.paths.last().map(PathBuf::as_path)
    }

    /// Every file opened so far, in order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Event identifier the active file was opened at
    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    /// Configuration in use
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    fn open_next(&mut self) -> Result<()> {
        let path = self.directory.join(self.config.file_name(self.next_index));
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "{}", header_line())?;

        debug!("opened {path:?}");
        self.next_index += 1;
        self.paths.push(path);
        self.writer = Some(writer);
        Ok(())
    }
}

impl Drop for RotatingWriter {
    fn drop(&mut self) {
        // nowhere to report a failure from here, use close() to see errors
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foiltools_geometry::Volume;

    #[test]
    fn policy_boundaries() {
        let policy = RotationPolicy::new(10);
        assert!(!policy.should_rotate(0, 0));
        assert!(!policy.should_rotate(0, 10));
        assert!(policy.should_rotate(0, 11));
        assert!(!policy.should_rotate(20, 10));
        assert!(policy.should_rotate(20, 9));
        assert!(policy.should_rotate(i32::MIN, i32::MAX));
    }

    #[test]
    fn row_layout() {
        let record = StepRecord {
            event_id: 3,
            particle: "alpha".to_string(),
            volume: Volume::FoilTa,
            edep_kev: 0.25,
            kinetic_energy_kev: 5000.0,
            global_time_ns: 0.0123456789,
            step_length_um: 1.0,
            momentum_kev: 193000.0,
            position_um: [-1.0, 2.0, 10007.5],
        };
        assert_eq!(
            format_row(&record, 6),
            concat!(
                "     3       alpha           2        0.25        5000   0.0123457",
                "           1      193000          -1           2     10007.5 "
            )
        );
        assert!(format_row(&record, 2).contains(" 1.9e+05 "));
    }

    #[test]
    fn long_values_are_not_truncated() {
        let record = StepRecord {
            event_id: 1_234_567,
            particle: "GenericIon".to_string(),
            edep_kev: -1.23456e-10,
            ..Default::default()
        };
        let row = format_row(&record, 6);
        assert!(row.starts_with(" 1234567  GenericIon           0  -1.23456e-10 "));
    }

    #[test]
    fn particle_names_must_be_single_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RotatingWriter::create(dir.path(), WriterConfig::default()).unwrap();

        for name in ["", "alpha particle", "e-\t", " "] {
            let record = StepRecord {
                particle: name.to_string(),
                ..Default::default()
            };
            assert!(matches!(
                writer.write_record(&record),
                Err(Error::InvalidParticleName(_))
            ));
        }

        let record = StepRecord {
            particle: "e-".to_string(),
            ..Default::default()
        };
        writer.write_record(&record).unwrap();
        writer.close().unwrap();

        let records = crate::reader::read_step_file(dir.path().join("run_0.dat")).unwrap();
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn closed_writer_does_not_rotate() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig {
            events_per_file: 1,
            ..Default::default()
        };
        let mut writer = RotatingWriter::create(dir.path(), config).unwrap();
        writer.close().unwrap();

        assert!(matches!(writer.observe_event(100), Err(Error::WriterClosed)));
        assert!(!writer.is_open());
        assert_eq!(writer.paths().len(), 1);
        assert!(!dir.path().join("run_1.dat").exists());
    }
}
