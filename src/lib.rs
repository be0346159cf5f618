//! `foiltools` is a small toolkit for scoring transport steps in a foil-stack
//! target
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use foiltools_format as format;

#[cfg(feature = "geometry")]
#[cfg_attr(docsrs, doc(cfg(feature = "geometry")))]
#[doc(inline)]
pub use foiltools_geometry as geometry;

#[cfg(feature = "recorder")]
#[cfg_attr(docsrs, doc(cfg(feature = "recorder")))]
#[doc(inline)]
pub use foiltools_recorder as recorder;

#[cfg(feature = "stepdat")]
#[cfg_attr(docsrs, doc(cfg(feature = "stepdat")))]
#[doc(inline)]
pub use foiltools_stepdat as stepdat;
