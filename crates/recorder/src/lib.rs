//! Recording of transport steps in the foil-stack target
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod config;
mod context;
mod error;
mod recorder;
mod tally;

// Inline anything important for a nice public API
#[doc(inline)]
pub use context::{Step, StepContext};

#[doc(inline)]
pub use config::RecorderConfig;

#[doc(inline)]
pub use recorder::StepRecorder;

#[doc(inline)]
pub use tally::{EventTally, RunTally};

#[doc(inline)]
pub use error::{Error, Result};
