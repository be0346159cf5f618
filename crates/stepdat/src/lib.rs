//! Step data files for the foil-stack target
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod parsers;
mod reader;
mod record;
mod schema;
mod summary;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use record::StepRecord;

#[doc(inline)]
pub use schema::{header_line, parse_header, validate_header, Column, ColumnKind, COLUMNS};

#[doc(inline)]
pub use writer::{format_row, RotatingWriter, RotationPolicy, WriterConfig};

#[doc(inline)]
pub use reader::{parse_row, read_paths, read_run, read_step_file, run_paths, StepFileReader};

#[doc(inline)]
pub use summary::{write_ascii_pretty, write_json, RunSummary, VolumeSummary};

#[doc(inline)]
pub use error::{Error, Result};
