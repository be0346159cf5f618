//! Read operations for step data files
//!
//! Rows are located by position, so any amount of whitespace between fields
//! is accepted. The header is checked before any rows are read.

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};
use crate::parsers::data_row;
use crate::record::StepRecord;
use crate::schema::validate_header;
use crate::writer::WriterConfig;

// foiltools modules
use foiltools_format::f;
use foiltools_geometry::Volume;

// external crates
use log::{debug, info, trace};
use rayon::prelude::*;

/// Parse a single data row into a [StepRecord]
///
/// The whole line must be consumed, and the volume code must be one of the
/// known scoring volumes.
///
/// ```rust
/// # use foiltools_stepdat::parse_row;
/// # use foiltools_geometry::Volume;
/// let line = "    12      proton           1         1.5  1000  0.5  2  43000  0  0  3 ";
/// let record = parse_row(line).unwrap();
/// assert_eq!(record.event_id, 12);
/// assert_eq!(record.volume, Volume::FoilAl);
/// assert_eq!(record.position_um, [0.0, 0.0, 3.0]);
/// ```
pub fn parse_row(line: &str) -> Result<StepRecord> {
    let (rest, raw) = data_row(line.trim_end())?;

    if !rest.is_empty() {
        return Err(Error::ParseError(f!("trailing content {rest:?}")));
    }

    let volume =
        Volume::try_from(raw.volume_code).map_err(|_| Error::UnknownVolumeCode(raw.volume_code))?;

    let v = &raw.values;
    Ok(StepRecord {
        event_id: raw.event_id,
        particle: raw.particle.to_string(),
        volume,
        edep_kev: v[0],
        kinetic_energy_kev: v[1],
        global_time_ns: v[2],
        step_length_um: v[3],
        momentum_kev: v[4],
        position_um: [v[5], v[6], v[7]],
    })
}

/// Iterator over the records of a single step data file
///
/// The header is validated when the reader is opened. Blank lines are
/// skipped, and any malformed row is reported with its line number.
#[derive(Debug)]
pub struct StepFileReader<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
}

impl StepFileReader<BufReader<File>> {
    /// Open a file and check its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file), path.as_ref())
    }
}

impl<R: BufRead> StepFileReader<R> {
    /// Wrap any buffered reader, `source` is only used in error messages
    pub fn new(reader: R, source: &Path) -> Result<Self> {
        let mut reader = Self {
            lines: reader.lines(),
            line_number: 0,
        };

        let header = reader
            .next_line()?
            .ok_or_else(|| Error::MissingHeader(source.to_path_buf()))?;
        validate_header(&header)?;
        trace!("valid header in {source:?}");

        Ok(reader)
    }

    /// Next non-blank line, or None at the end of the file
    fn next_line(&mut self) -> Result<Option<String>> {
        for line in self.lines.by_ref() {
            self.line_number += 1;
            let line = line?;
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

impl<R: BufRead> Iterator for StepFileReader<R> {
    type Item = Result<StepRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some(line)) => Some(parse_row(&line).map_err(|e| match e {
                Error::ParseError(reason) => {
                    Error::ParseError(f!("line {}: {reason}", self.line_number))
                }
                other => other,
            })),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Read every record from a step data file
///
/// ```rust, no_run
/// # use foiltools_stepdat::read_step_file;
/// let records = read_step_file("./output/run_0.dat").unwrap();
/// println!("{} steps", records.len());
/// ```
pub fn read_step_file<P: AsRef<Path>>(path: P) -> Result<Vec<StepRecord>> {
    let records = StepFileReader::open(path.as_ref())?.collect::<Result<Vec<StepRecord>>>()?;
    debug!("read {} records from {:?}", records.len(), path.as_ref());
    Ok(records)
}

/// Paths of the files making up a run, in sequence
///
/// Collects `<prefix>0.<ext>`, `<prefix>1.<ext>`, ... up to the first index
/// that does not exist.
pub fn run_paths<P: AsRef<Path>>(directory: P, config: &WriterConfig) -> Vec<PathBuf> {
    (0..)
        .map(|i| directory.as_ref().join(config.file_name(i)))
        .take_while(|path| path.is_file())
        .collect()
}

/// Read a known list of files, concatenated in the order given
///
/// Files are parsed in parallel.
///
/// ```rust, no_run
/// # use foiltools_stepdat::{read_paths, RotatingWriter, WriterConfig};
/// let mut writer = RotatingWriter::create("./output", WriterConfig::default()).unwrap();
/// writer.close().unwrap();
/// let records = read_paths(writer.paths()).unwrap();
/// ```
pub fn read_paths<P: AsRef<Path> + Sync>(paths: &[P]) -> Result<Vec<StepRecord>> {
    let files = paths
        .par_iter()
        .map(read_step_file)
        .collect::<Result<Vec<Vec<StepRecord>>>>()?;

    Ok(files.into_iter().flatten().collect())
}

/// Read every file of a run, concatenated in file order
///
/// Files are parsed in parallel. Any error in any file fails the whole run.
///
/// ```rust, no_run
/// # use foiltools_stepdat::{read_run, WriterConfig};
/// let records = read_run("./output", &WriterConfig::default()).unwrap();
/// ```
pub fn read_run<P: AsRef<Path>>(directory: P, config: &WriterConfig) -> Result<Vec<StepRecord>> {
    let paths = run_paths(directory.as_ref(), config);
    if paths.is_empty() {
        return Err(Error::NoRunFiles(directory.as_ref().to_path_buf()));
    }

    let records = read_paths(&paths)?;
    info!(
        "read {} records from {} files in {:?}",
        records.len(),
        paths.len(),
        directory.as_ref()
    );
    Ok(records)
}
